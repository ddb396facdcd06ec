//! Group model: a named, slug-addressed category for posts.
//!
//! Groups are created by administrators; this codebase only reads them and
//! points posts at them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    /// Unique URL-safe identifier used in `/group/{slug}/`
    pub slug: String,
    pub description: String,
}

/// Group reference embedded in post views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
}
