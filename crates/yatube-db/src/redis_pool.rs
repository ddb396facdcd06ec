//! Redis connection helpers used by the shared page cache.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Open a managed connection (reconnects on failure).
pub async fn connect(url: &str) -> Result<ConnectionManager, redis::RedisError> {
    let client = redis::Client::open(url)?;
    ConnectionManager::new(client).await
}

/// Set a key with expiration.
pub async fn set_ex(
    conn: &mut ConnectionManager,
    key: &str,
    value: &[u8],
    ttl_secs: u64,
) -> Result<(), redis::RedisError> {
    conn.set_ex(key, value, ttl_secs).await
}

/// Get a value by key.
pub async fn get(
    conn: &mut ConnectionManager,
    key: &str,
) -> Result<Option<Vec<u8>>, redis::RedisError> {
    conn.get(key).await
}

/// Delete every key starting with `prefix`.
pub async fn del_prefix(conn: &mut ConnectionManager, prefix: &str) -> Result<(), redis::RedisError> {
    let mut keys = Vec::new();
    {
        let mut iter = conn.scan_match::<_, String>(format!("{prefix}*")).await?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        return Ok(());
    }
    conn.del(keys).await
}
