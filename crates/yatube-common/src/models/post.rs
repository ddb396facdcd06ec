//! Post model: authored text with an optional group and image.
//!
//! The author and publication date are fixed when the post is created; edits
//! go through [`PostChanges`], which has no way to name either of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthorSummary, DomainError, GroupSummary, user::full_name};
use crate::validation::{FormErrors, is_blank};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    /// Media storage key, e.g. `posts/small.gif`
    pub image: Option<String>,
}

impl Post {
    /// Only the author may edit a post; anonymous actors never can.
    pub fn can_edit(&self, actor: Option<i64>) -> bool {
        actor == Some(self.author_id)
    }
}

/// Validated values for a post that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    author_id: i64,
    text: String,
    group_id: Option<i64>,
    image: Option<String>,
}

impl NewPost {
    pub fn new(
        author_id: i64,
        text: impl Into<String>,
        group_id: Option<i64>,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        let text = text.into();
        if is_blank(&text) {
            return Err(DomainError::EmptyText { field: "text" });
        }
        Ok(Self {
            author_id,
            text,
            group_id,
            image,
        })
    }

    pub fn author_id(&self) -> i64 {
        self.author_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn group_id(&self) -> Option<i64> {
        self.group_id
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Validated edit of an existing post: text, group and image only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    text: String,
    group_id: Option<i64>,
    image: Option<String>,
}

impl PostChanges {
    pub fn new(
        text: impl Into<String>,
        group_id: Option<i64>,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        let text = text.into();
        if is_blank(&text) {
            return Err(DomainError::EmptyText { field: "text" });
        }
        Ok(Self {
            text,
            group_id,
            image,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn group_id(&self) -> Option<i64> {
        self.group_id
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Post joined with its author and group, as listing queries return it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
}

/// Post as shown on pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author: AuthorSummary,
    pub group: Option<GroupSummary>,
}

impl From<PostRow> for PostView {
    fn from(r: PostRow) -> Self {
        let group = match (r.group_id, r.group_title, r.group_slug) {
            (Some(id), Some(title), Some(slug)) => Some(GroupSummary { id, title, slug }),
            _ => None,
        };
        Self {
            id: r.id,
            text: r.text,
            pub_date: r.pub_date,
            image: r.image,
            author: AuthorSummary {
                id: r.author_id,
                full_name: full_name(&r.author_first_name, &r.author_last_name),
                username: r.author_username,
            },
            group,
        }
    }
}

/// Submitted post form fields (create and edit share it).
///
/// `image` is not a form value: uploads are stored first and passed in as a key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<i64>,
}

impl PostForm {
    /// Prefill from an existing post (edit page).
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id,
        }
    }

    /// Field-level checks that need no storage access.
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if is_blank(&self.text) {
            errors.add("text", REQUIRED_MESSAGE);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
