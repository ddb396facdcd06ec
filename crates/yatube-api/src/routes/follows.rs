//! Subscriptions: the follow feed and follow/unfollow toggles.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use std::sync::Arc;
use yatube_common::{
    error::{YatubeError, YatubeResult},
    models::FollowEdge,
    urls,
};
use yatube_db::repository::{follows, users};

use crate::{
    AppState,
    feed::{self, PageQuery},
    middleware::RequireUser,
    render::{self, Rendered},
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/follow/", get(follow_index))
        .route("/profile/{username}/follow/", get(profile_follow))
        .route("/profile/{username}/unfollow/", get(profile_unfollow))
}

/// GET /follow/: posts by followed authors.
async fn follow_index(
    RequireUser(auth): RequireUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> YatubeResult<Rendered> {
    feed::follow_feed(&state, auth.user_id, query.raw()).await
}

/// GET /profile/{username}/follow/
///
/// Following yourself or someone already followed changes nothing.
async fn profile_follow(
    RequireUser(auth): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> YatubeResult<Response> {
    let author = users::find_by_username(&state.db.pool, &username)
        .await?
        .ok_or_else(|| YatubeError::not_found("User"))?;

    match FollowEdge::new(auth.user_id, author.id) {
        Ok(edge) => {
            if follows::create_follow(&state.db.pool, &edge).await? {
                tracing::info!(follower = %auth.username, author = %author.username, "Followed");
            }
        }
        Err(e) => tracing::debug!(user = %auth.username, "Follow skipped: {e}"),
    }

    Ok(render::redirect(&urls::profile(&author.username)))
}

/// GET /profile/{username}/unfollow/
async fn profile_unfollow(
    RequireUser(auth): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> YatubeResult<Response> {
    let author = users::find_by_username(&state.db.pool, &username)
        .await?
        .ok_or_else(|| YatubeError::not_found("User"))?;

    if follows::delete_follow(&state.db.pool, auth.user_id, author.id).await? {
        tracing::info!(follower = %auth.username, author = %author.username, "Unfollowed");
    }

    Ok(render::redirect(&urls::profile(&author.username)))
}
