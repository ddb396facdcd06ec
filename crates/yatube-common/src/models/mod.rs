//! Core domain models shared across all Yatube crates.
//!
//! These are the "truth" types: what the database stores and the views serialize.
//! Insertable values (`NewPost`, `NewComment`, `FollowEdge`) can only be built
//! through constructors that enforce the entity invariants.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

/// Re-export all model types for convenience.
pub use comment::*;
pub use follow::*;
pub use group::*;
pub use post::*;
pub use user::*;

use crate::error::YatubeError;

/// Invariant violations caught while building an entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    EmptyText { field: &'static str },

    #[error("Users cannot follow themselves")]
    SelfFollow,
}

impl From<DomainError> for YatubeError {
    fn from(e: DomainError) -> Self {
        YatubeError::Validation {
            message: e.to_string(),
        }
    }
}
