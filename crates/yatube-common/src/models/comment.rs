//! Comment model: text attached to exactly one post by exactly one author.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthorSummary, DomainError, post::REQUIRED_MESSAGE, user::full_name};
use crate::validation::{FormErrors, is_blank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Validated comment ready to insert. Post and author are fixed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    post_id: i64,
    author_id: i64,
    text: String,
}

impl NewComment {
    pub fn new(post_id: i64, author_id: i64, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if is_blank(&text) {
            return Err(DomainError::EmptyText { field: "text" });
        }
        Ok(Self {
            post_id,
            author_id,
            text,
        })
    }

    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    pub fn author_id(&self) -> i64 {
        self.author_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Comment joined with its author.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author: AuthorSummary,
}

impl From<CommentRow> for CommentView {
    fn from(r: CommentRow) -> Self {
        Self {
            id: r.id,
            post_id: r.post_id,
            text: r.text,
            created: r.created,
            author: AuthorSummary {
                id: r.author_id,
                full_name: full_name(&r.author_first_name, &r.author_last_name),
                username: r.author_username,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if is_blank(&self.text) {
            errors.add("text", REQUIRED_MESSAGE);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
