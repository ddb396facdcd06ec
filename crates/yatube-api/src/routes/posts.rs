//! Post writes: create, edit and comment.
//!
//! All three require a logged-in user. Every successful write drops the
//! cached index pages before redirecting.

use axum::{
    Router,
    extract::{Form, Path, State, rejection::FormRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use yatube_common::{
    error::{YatubeError, YatubeResult},
    models::{CommentForm, Group, NewComment, NewPost, PostChanges, PostForm},
    permissions, urls,
    validation::FormErrors,
};
use yatube_db::{
    repository::{comments, groups, posts},
    storage::POSTS_DIR,
};

use crate::{
    AppState,
    forms::{FormContext, ImageUpload, PostSubmission},
    middleware::RequireUser,
    render::{self, Rendered},
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create/", get(create_form).post(create_post))
        .route("/posts/{post_id}/edit/", get(edit_form).post(edit_post))
        .route("/posts/{post_id}/comment/", post(add_comment))
}

#[derive(Serialize)]
struct PostFormContext {
    form: FormContext,
    /// Where the form posts to.
    action: String,
    is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_id: Option<i64>,
}

fn render_post_form(
    groups: &[Group],
    values: &PostForm,
    errors: FormErrors,
    post_id: Option<i64>,
) -> YatubeResult<Rendered> {
    Rendered::new(
        render::POST_CREATE,
        PostFormContext {
            form: FormContext::post_form(groups, values, errors),
            action: post_id.map_or_else(|| urls::POST_CREATE.to_string(), urls::post_edit),
            is_edit: post_id.is_some(),
            post_id,
        },
    )
}

async fn store_image(state: &AppState, upload: ImageUpload) -> YatubeResult<String> {
    let key = state
        .storage
        .save(POSTS_DIR, &upload.file_name, &upload.data)
        .await?;
    Ok(key)
}

/// GET /create/: empty post form.
async fn create_form(
    RequireUser(_auth): RequireUser,
    State(state): State<Arc<AppState>>,
) -> YatubeResult<Rendered> {
    let groups = groups::list_groups(&state.db.pool).await?;
    render_post_form(&groups, &PostForm::default(), FormErrors::new(), None)
}

/// POST /create/: publish a post and go to the author's profile.
async fn create_post(
    RequireUser(auth): RequireUser,
    State(state): State<Arc<AppState>>,
    submission: PostSubmission,
) -> YatubeResult<Response> {
    let groups = groups::list_groups(&state.db.pool).await?;
    let cleaned = match submission.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err((values, errors)) => {
            return Ok(render_post_form(&groups, &values, errors, None)?.into_response());
        }
    };

    let image = match cleaned.image {
        Some(upload) => Some(store_image(&state, upload).await?),
        None => None,
    };
    let new_post = NewPost::new(auth.user_id, cleaned.text, cleaned.group_id, image)?;
    let post = posts::create_post(&state.db.pool, &new_post).await?;

    tracing::info!(
        post_id = post.id,
        author = %auth.username,
        group = ?post.group_id,
        "Post created"
    );
    super::invalidate_index(&state).await;

    Ok(render::redirect(&urls::profile(&auth.username)))
}

/// GET /posts/{post_id}/edit/: the post form bound to the existing post.
async fn edit_form(
    RequireUser(auth): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> YatubeResult<Rendered> {
    let post_id = super::parse_post_id(&post_id)?;
    let post = posts::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or_else(|| YatubeError::not_found("Post"))?;
    permissions::ensure_can_edit(&post, Some(auth.user_id))?;

    let groups = groups::list_groups(&state.db.pool).await?;
    render_post_form(
        &groups,
        &PostForm::from_post(&post),
        FormErrors::new(),
        Some(post.id),
    )
}

/// POST /posts/{post_id}/edit/: change text, group or image in place.
///
/// Author and publication date stay as they were. Non-authors are sent back
/// to the post page without any change.
async fn edit_post(
    RequireUser(auth): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    submission: PostSubmission,
) -> YatubeResult<Response> {
    let post_id = super::parse_post_id(&post_id)?;
    let post = posts::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or_else(|| YatubeError::not_found("Post"))?;
    permissions::ensure_can_edit(&post, Some(auth.user_id))?;

    let groups = groups::list_groups(&state.db.pool).await?;
    let cleaned = match submission.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err((values, errors)) => {
            return Ok(render_post_form(&groups, &values, errors, Some(post.id))?.into_response());
        }
    };

    // No new upload keeps the current image.
    let image = match cleaned.image {
        Some(upload) => Some(store_image(&state, upload).await?),
        None => post.image.clone(),
    };
    let changes = PostChanges::new(cleaned.text, cleaned.group_id, image)?;
    let updated = posts::update_post(&state.db.pool, post.id, &changes).await?;

    tracing::info!(
        post_id = updated.id,
        author = %auth.username,
        group = ?updated.group_id,
        "Post edited"
    );
    super::invalidate_index(&state).await;

    Ok(render::redirect(&urls::post_detail(updated.id)))
}

/// POST /posts/{post_id}/comment/: always ends on the post page.
///
/// An empty or unreadable comment is dropped without an error.
async fn add_comment(
    RequireUser(auth): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    form: Result<Form<CommentForm>, FormRejection>,
) -> YatubeResult<Response> {
    let post_id = super::parse_post_id(&post_id)?;
    let post = posts::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or_else(|| YatubeError::not_found("Post"))?;

    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!(post_id, "Unreadable comment form: {e}");
            CommentForm::default()
        }
    };

    if form.clean().is_ok() {
        let new_comment = NewComment::new(post.id, auth.user_id, form.text)?;
        let comment = comments::create_comment(&state.db.pool, &new_comment).await?;
        tracing::info!(
            comment_id = comment.id,
            post_id = post.id,
            author = %auth.username,
            "Comment added"
        );
        super::invalidate_index(&state).await;
    }

    Ok(render::redirect(&urls::post_detail(post.id)))
}
