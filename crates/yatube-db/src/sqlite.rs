//! SQLite connection helpers.

use sqlx::SqlitePool;

/// Health check: verify the database is reachable.
pub async fn health_check(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
