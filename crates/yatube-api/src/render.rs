//! Page rendering.
//!
//! A page is the name of its template plus the context the template would be
//! filled with, sent as `{"template": ..., "context": {...}}`.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use yatube_common::error::{YatubeError, YatubeResult};

pub const INDEX: &str = "posts/index.html";
pub const GROUP_LIST: &str = "posts/group_list.html";
pub const PROFILE: &str = "posts/profile.html";
pub const POST_DETAIL: &str = "posts/post_detail.html";
pub const POST_CREATE: &str = "posts/post_create.html";
pub const FOLLOW: &str = "posts/follow.html";
pub const SIGNUP: &str = "users/signup.html";
pub const LOGIN: &str = "users/login.html";

/// A rendered page.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    pub template: &'static str,
    pub context: Value,
}

impl Rendered {
    pub fn new(template: &'static str, context: impl Serialize) -> YatubeResult<Self> {
        let context = serde_json::to_value(context)
            .map_err(|e| YatubeError::Internal(anyhow::anyhow!("context serialisation: {e}")))?;
        Ok(Self { template, context })
    }

    /// Response body bytes, the unit the page cache stores.
    pub fn to_bytes(&self) -> YatubeResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| YatubeError::Internal(anyhow::anyhow!("page serialisation: {e}")))
    }
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        match self.to_bytes() {
            Ok(body) => page_response(body),
            Err(e) => e.into_response(),
        }
    }
}

/// A 200 response carrying an already rendered page body.
pub fn page_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// 302 to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
