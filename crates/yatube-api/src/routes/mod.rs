//! Page route modules.

pub mod auth;
pub mod feeds;
pub mod follows;
pub mod health;
pub mod posts;

use axum::http::Uri;
use yatube_common::error::{YatubeError, YatubeResult};

use crate::AppState;

/// Unknown paths.
pub async fn not_found(uri: Uri) -> YatubeError {
    tracing::debug!(path = %uri.path(), "No route");
    YatubeError::not_found("Page")
}

/// Post ids in paths are plain integers; anything else names no post.
pub(crate) fn parse_post_id(raw: &str) -> YatubeResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| YatubeError::not_found("Post"))
}

/// Drop cached index pages after a write that changes what they show.
///
/// A cache failure is logged and swallowed; the write itself already
/// committed.
pub(crate) async fn invalidate_index(state: &AppState) {
    if let Err(e) = state.cache.invalidate_index().await {
        tracing::warn!("Failed to invalidate index cache: {e}");
    }
}
