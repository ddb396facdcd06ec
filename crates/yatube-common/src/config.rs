//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Posts shown on every paginated listing unless overridden by `feed.posts_per_page`.
pub const DEFAULT_POSTS_PER_PAGE: usize = 10;

/// Lifetime of a cached index page, in seconds.
pub const DEFAULT_INDEX_TTL_SECS: u64 = 20;

/// Get the global application configuration.
///
/// # Panics
/// Panics if config has not been initialized via [`init`].
pub fn get() -> &'static AppConfig {
    CONFIG.get().expect("Config not initialized. Call yatube_common::config::init() first.")
}

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup, before any other code accesses config.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let app_config = load()?;
    Ok(CONFIG.get_or_init(|| app_config))
}

/// Build a configuration from defaults, `config.toml` and `YATUBE__*` variables
/// without registering it globally.
pub fn load() -> Result<AppConfig, config::ConfigError> {
    config::Config::builder()
        // Defaults
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("database.url", "sqlite://yatube.db?mode=rwc")?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("auth.jwt_secret", "change-me")?
        .set_default("auth.session_ttl_secs", 1_209_600)? // 2 weeks
        .set_default("storage.data_dir", "./media")?
        .set_default("storage.media_url", "/media/")?
        .set_default("cache.index_ttl_secs", DEFAULT_INDEX_TTL_SECS)?
        .set_default("feed.posts_per_page", DEFAULT_POSTS_PER_PAGE as u64)?
        .set_default("feed.title_symbols", 30)?
        // Optional config file
        .add_source(config::File::with_name("config").required(false))
        // Environment variables (YATUBE__SERVER__PORT, YATUBE__DATABASE__URL, etc.)
        .add_source(
            config::Environment::with_prefix("YATUBE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (`sqlite::memory:` works for throwaway runs)
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    /// Redis connection URL: optional; the page cache stays in-process without it.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Session token signing secret (HS256)
    pub jwt_secret: String,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory uploaded post images are written to.
    pub data_dir: String,
    /// URL prefix the media directory is served under.
    pub media_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub index_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Page size shared by every listing view.
    pub posts_per_page: usize,
    /// Characters of post text used as the detail page title.
    pub title_symbols: usize,
}
