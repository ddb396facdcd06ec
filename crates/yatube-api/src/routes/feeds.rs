//! Read-only pages: index, group listing, profile and post detail.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use yatube_common::error::YatubeResult;
use yatube_db::cache;

use crate::{
    AppState,
    feed::{self, PageQuery},
    middleware::CurrentUser,
    render::{self, Rendered},
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/group/{slug}/", get(group_posts))
        .route("/profile/{username}/", get(profile))
        .route("/posts/{post_id}/", get(post_detail))
}

/// GET /: all posts, newest first.
///
/// Rendered pages are kept in the page cache for the configured TTL; post and
/// comment writes drop them.
async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> YatubeResult<Response> {
    let key = cache::index_key(query.raw());

    match state.cache.get(&key).await {
        Ok(Some(body)) => {
            tracing::trace!(key = %key, "Index page served from cache");
            return Ok(render::page_response(body));
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Page cache read failed: {e}"),
    }

    let body = feed::index_feed(&state, query.raw()).await?.to_bytes()?;
    if let Err(e) = state.cache.put(&key, body.clone()).await {
        tracing::warn!("Page cache write failed: {e}");
    }

    Ok(render::page_response(body))
}

/// GET /group/{slug}/
async fn group_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> YatubeResult<Rendered> {
    feed::group_feed(&state, &slug, query.raw()).await
}

/// GET /profile/{username}/
async fn profile(
    State(state): State<Arc<AppState>>,
    viewer: CurrentUser,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> YatubeResult<Rendered> {
    feed::profile_feed(&state, &username, viewer.id(), query.raw()).await
}

/// GET /posts/{post_id}/
async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> YatubeResult<impl IntoResponse> {
    let post_id = super::parse_post_id(&post_id)?;
    feed::post_detail(&state, post_id).await
}
