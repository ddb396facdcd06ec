//! Follow model: directed edge from a reader to an author.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    /// The reader
    pub user_id: i64,
    /// The followed author
    pub author_id: i64,
    pub created: DateTime<Utc>,
}

/// An edge that is allowed to exist: follower and author differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowEdge {
    user_id: i64,
    author_id: i64,
}

impl FollowEdge {
    pub fn new(user_id: i64, author_id: i64) -> Result<Self, DomainError> {
        if user_id == author_id {
            return Err(DomainError::SelfFollow);
        }
        Ok(Self { user_id, author_id })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn author_id(&self) -> i64 {
        self.author_id
    }
}
