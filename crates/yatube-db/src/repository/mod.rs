//! Repository layer: query functions organized by entity.
//!
//! Listing queries return rows ordered newest first and take an explicit
//! `limit`/`offset` window, so callers never see SQL.

pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod users;
