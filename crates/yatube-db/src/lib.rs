//! # yatube-db
//!
//! Storage layer for Yatube:
//! - **SQLite**: users, groups, posts, comments, follows (via `sqlx`)
//! - **Media directory**: uploaded post images
//! - **Page cache**: rendered index pages, in-process or in Redis

pub mod cache;
pub mod redis_pool;
pub mod repository;
pub mod sqlite;
pub mod storage;

use std::str::FromStr;

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Shared database state passed through Axum extractors.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Connect to the configured SQLite database, creating the file if needed.
    pub async fn connect(config: &yatube_common::config::AppConfig) -> Result<Self> {
        tracing::info!(url = %config.database.url, "Connecting to SQLite...");
        let options = SqliteConnectOptions::from_str(&config.database.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect_with(options)
            .await?;

        tracing::info!("Connected to SQLite");
        Ok(Self { pool })
    }

    /// Private in-memory database, already migrated.
    ///
    /// A single connection is kept alive for the pool's lifetime; every
    /// connection to `:memory:` would otherwise see its own empty database.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}
