//! Middleware: identity extraction and security headers.
//!
//! The acting user is read from the `sessionid` cookie set at login, or from an
//! `Authorization: Bearer <token>` header for scripted clients. A missing or
//! invalid token simply means an anonymous visitor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use yatube_common::error::YatubeError;

use crate::{AppState, auth};

/// Authenticated user attached to a request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
}

/// The acting user, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthContext>);

impl CurrentUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }
}

/// The acting user on a login-only page.
///
/// Anonymous visitors are rejected with a redirect to the login page that
/// remembers the requested path.
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthContext);

fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(auth::SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Resolve the identity carried by `headers`.
pub fn identify(headers: &HeaderMap, secret: &str) -> Option<AuthContext> {
    let token = session_token(headers)?;
    let claims = match auth::validate_token(&token, secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Ignoring invalid session token: {e}");
            return None;
        }
    };
    let user_id = claims.user_id()?;
    Some(AuthContext {
        user_id,
        username: claims.username,
    })
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(identify(
            &parts.headers,
            &state.settings.jwt_secret,
        )))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = YatubeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        identify(&parts.headers, &state.settings.jwt_secret)
            .map(RequireUser)
            .ok_or_else(|| YatubeError::Unauthenticated {
                next: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string()),
            })
    }
}

// ── Security headers ──────────────────────────────────────────────────────────

/// Add security headers to every HTTP response.
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Referrer-Policy: same-origin`
/// - `Content-Security-Policy` limited to this origin, images also from `data:`
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let h = response.headers_mut();

    macro_rules! set {
        ($name:expr, $val:expr) => {
            if let Ok(v) = $val.parse::<axum::http::HeaderValue>() {
                h.insert($name, v);
            }
        };
    }

    set!(header::X_CONTENT_TYPE_OPTIONS, "nosniff");
    set!(header::X_FRAME_OPTIONS, "DENY");
    set!(header::REFERRER_POLICY, "same-origin");
    set!(
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self'; img-src 'self' data:; frame-ancestors 'none'"
    );

    response
}
