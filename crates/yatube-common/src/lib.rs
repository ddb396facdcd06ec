//! # yatube-common
//!
//! Shared types, configuration, error handling, and utilities used across all Yatube crates.
//! This is the foundation layer: entity invariants and access rules live here,
//! storage and HTTP do not.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod permissions;
pub mod urls;
pub mod validation;
