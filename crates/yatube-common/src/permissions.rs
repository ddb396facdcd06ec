//! Access rules: who may create, edit and follow.
//!
//! Anonymous visitors can read everything and change nothing. Mutations by an
//! anonymous visitor become a login redirect; editing someone else's post
//! bounces back to that post's page.

use crate::error::{YatubeError, YatubeResult};
use crate::models::Post;
use crate::urls;

/// `true` iff `actor` wrote `post`.
pub fn can_edit(post: &Post, actor: Option<i64>) -> bool {
    post.can_edit(actor)
}

/// Gate an edit: non-authors are sent to the post detail page.
pub fn ensure_can_edit(post: &Post, actor: Option<i64>) -> YatubeResult<()> {
    if can_edit(post, actor) {
        Ok(())
    } else {
        Err(YatubeError::Forbidden {
            redirect: urls::post_detail(post.id),
        })
    }
}
