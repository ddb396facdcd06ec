//! # yatube-api
//!
//! HTTP layer for Yatube: the four post feeds, post detail, post/comment/follow
//! mutations and session authentication. Pages "render" as JSON documents
//! naming their template and carrying the template context.

pub mod auth;
pub mod feed;
pub mod forms;
pub mod middleware;
pub mod render;
pub mod routes;

use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;
use std::time::Duration;
use yatube_common::config::AppConfig;
use yatube_db::{Database, cache::PageCache, storage::MediaStorage};

/// Largest accepted request body (post images travel inside the form).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Process-wide values read once from configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The single page size used by every listing.
    pub page_size: usize,
    /// Characters of post text used as the detail page title.
    pub title_symbols: usize,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
    pub index_ttl: Duration,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.feed.posts_per_page.max(1),
            title_symbols: config.feed.title_symbols,
            jwt_secret: config.auth.jwt_secret.clone(),
            session_ttl_secs: config.auth.session_ttl_secs,
            index_ttl: Duration::from_secs(config.cache.index_ttl_secs),
        }
    }
}

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Rendered index pages; dropped on every post or comment write.
    pub cache: PageCache,
    /// Where uploaded post images are written.
    pub storage: MediaStorage,
    pub settings: Settings,
}

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::feeds::router())
        .merge(routes::posts::router())
        .merge(routes::follows::router())
        .merge(routes::auth::router())
        .merge(routes::health::router())
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
