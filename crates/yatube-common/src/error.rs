//! Centralized error types for Yatube.
//!
//! Uses `thiserror` for ergonomic error definitions. Page-oriented failures
//! (anonymous access, foreign edits) turn into redirects rather than error
//! pages; everything else becomes a JSON error body.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Where anonymous visitors are sent when they try a protected page.
pub const LOGIN_URL: &str = "/auth/login/";

/// Core application error type used across all Yatube crates.
#[derive(Debug, thiserror::Error)]
pub enum YatubeError {
    // === Auth errors ===
    /// No identity on a request that needs one. Carries the path to return to.
    #[error("Authentication required")]
    Unauthenticated { next: String },

    // === Resource errors ===
    #[error("{resource} not found")]
    NotFound { resource: String },

    // === Validation errors ===
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // === Permission errors ===
    /// Acting user may not touch the target; the user is sent to `redirect`.
    #[error("Forbidden")]
    Forbidden { redirect: String },

    // === Infrastructure errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
}

impl YatubeError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated { .. } | Self::Forbidden { .. } => StatusCode::FOUND,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Redis(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &str {
        match self {
            Self::Unauthenticated { .. } => "UNAUTHENTICATED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Redis(_) => "CACHE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Build the login URL that brings the visitor back to `next` afterwards.
///
/// Slashes stay readable (`/auth/login/?next=/create/`).
pub fn login_redirect_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN_URL}?next={}", encoded.replace("%2F", "/"))
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

impl IntoResponse for YatubeError {
    fn into_response(self) -> Response {
        match &self {
            YatubeError::Unauthenticated { next } => return found(&login_redirect_url(next)),
            YatubeError::Forbidden { redirect } => return found(redirect),
            _ => {}
        }

        let status = self.status_code();

        // Don't leak internal details to clients
        let message = match &self {
            YatubeError::Database(e) => {
                tracing::error!("Database error: {e}");
                "An internal error occurred".to_string()
            }
            YatubeError::Redis(e) => {
                tracing::error!("Redis error: {e}");
                "An internal error occurred".to_string()
            }
            YatubeError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                "An internal error occurred".to_string()
            }
            YatubeError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results using YatubeError.
pub type YatubeResult<T> = Result<T, YatubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirect_keeps_slashes() {
        assert_eq!(login_redirect_url("/create/"), "/auth/login/?next=/create/");
    }

    #[test]
    fn login_redirect_escapes_query() {
        assert_eq!(
            login_redirect_url("/follow/?page=2"),
            "/auth/login/?next=/follow/%3Fpage%3D2"
        );
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        let resp = YatubeError::Unauthenticated {
            next: "/create/".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/auth/login/?next=/create/"
        );
    }

    #[test]
    fn not_found_is_404() {
        let resp = YatubeError::not_found("Post").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
