//! Rendered-page cache for the index feed.
//!
//! Entries are whole response bodies keyed by view and page. They expire after
//! a fixed TTL and are dropped early whenever a post is created, edited or
//! commented on, so a stale index is only ever served inside that window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use redis::aio::ConnectionManager;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::redis_pool;

/// Every index page key starts with this.
pub const INDEX_PREFIX: &str = "index:";

const REDIS_NAMESPACE: &str = "yatube:page:";

/// Cache key for one page of the index feed (`raw_page` is the `?page=` value).
pub fn index_key(raw_page: Option<&str>) -> String {
    let page = raw_page.map(str::trim).filter(|p| !p.is_empty()).unwrap_or("1");
    format!("{INDEX_PREFIX}page:{page}")
}

struct Entry {
    body: Vec<u8>,
    expires_at: Instant,
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<RwLock<HashMap<String, Entry>>>),
    Redis(ConnectionManager),
}

/// Keyed page cache with a fixed time-to-live.
#[derive(Clone)]
pub struct PageCache {
    backend: Backend,
    ttl: Duration,
}

impl PageCache {
    /// Process-local cache; each server process keeps its own copy.
    pub fn in_memory(ttl: Duration) -> Self {
        Self {
            backend: Backend::Memory(Arc::new(RwLock::new(HashMap::new()))),
            ttl,
        }
    }

    /// Cache shared by every process pointed at the same Redis.
    pub async fn redis(url: &str, ttl: Duration) -> Result<Self, redis::RedisError> {
        let conn = redis_pool::connect(url).await?;
        tracing::info!("Page cache backed by Redis");
        Ok(Self {
            backend: Backend::Redis(conn),
            ttl,
        })
    }

    /// Cached body for `key`, if present and not expired.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, redis::RedisError> {
        match &self.backend {
            Backend::Memory(map) => {
                let now = Instant::now();
                let guard = map.read().await;
                Ok(guard
                    .get(key)
                    .filter(|e| e.expires_at > now)
                    .map(|e| e.body.clone()))
            }
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                redis_pool::get(&mut conn, &format!("{REDIS_NAMESPACE}{key}")).await
            }
        }
    }

    /// Store `body` under `key` for one TTL.
    pub async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), redis::RedisError> {
        match &self.backend {
            Backend::Memory(map) => {
                let mut guard = map.write().await;
                let now = Instant::now();
                guard.retain(|_, e| e.expires_at > now);
                guard.insert(
                    key.to_string(),
                    Entry {
                        body,
                        expires_at: now + self.ttl,
                    },
                );
                Ok(())
            }
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                let ttl_secs = self.ttl.as_secs().max(1);
                redis_pool::set_ex(&mut conn, &format!("{REDIS_NAMESPACE}{key}"), &body, ttl_secs)
                    .await
            }
        }
    }

    /// Drop every entry whose key starts with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) -> Result<(), redis::RedisError> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.retain(|k, _| !k.starts_with(prefix));
                Ok(())
            }
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                redis_pool::del_prefix(&mut conn, &format!("{REDIS_NAMESPACE}{prefix}")).await
            }
        }
    }

    /// Forget all cached index pages.
    pub async fn invalidate_index(&self) -> Result<(), redis::RedisError> {
        tracing::debug!("Invalidating cached index pages");
        self.invalidate_prefix(INDEX_PREFIX).await
    }

    /// Forget everything.
    pub async fn clear(&self) -> Result<(), redis::RedisError> {
        self.invalidate_prefix("").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_keys_default_to_first_page() {
        assert_eq!(index_key(None), "index:page:1");
        assert_eq!(index_key(Some(" ")), "index:page:1");
        assert_eq!(index_key(Some("2")), "index:page:2");
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = PageCache::in_memory(Duration::from_secs(20));
        cache.put("index:page:1", b"first".to_vec()).await.unwrap();

        tokio::time::advance(Duration::from_secs(19)).await;
        assert_eq!(cache.get("index:page:1").await.unwrap(), Some(b"first".to_vec()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("index:page:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalidate_index_keeps_other_views() {
        let cache = PageCache::in_memory(Duration::from_secs(20));
        cache.put(&index_key(None), b"a".to_vec()).await.unwrap();
        cache.put(&index_key(Some("2")), b"b".to_vec()).await.unwrap();
        cache.put("group:test_slug", b"c".to_vec()).await.unwrap();

        cache.invalidate_index().await.unwrap();

        assert!(cache.get(&index_key(None)).await.unwrap().is_none());
        assert!(cache.get(&index_key(Some("2"))).await.unwrap().is_none());
        assert!(cache.get("group:test_slug").await.unwrap().is_some());

        cache.clear().await.unwrap();
        assert!(cache.get("group:test_slug").await.unwrap().is_none());
    }
}
