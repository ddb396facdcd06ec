//! Account routes: sign up, log in, log out.
//!
//! A successful sign-up or login stores a signed session token in the
//! HTTP-only `sessionid` cookie and sends the visitor to `next`.

use axum::{
    Router,
    extract::{Form, Query, State, rejection::FormRejection},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use yatube_common::{
    error::{YatubeError, YatubeResult},
    models::user::{LoginForm, SignupForm, User},
    urls,
    validation::{FormErrors, validate_form},
};
use yatube_db::repository::users;

use crate::{
    AppState,
    auth::{self, SESSION_COOKIE},
    forms::FormContext,
    render::{self, Rendered},
};

pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";
pub const BAD_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Auth router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup/", get(signup_form).post(signup))
        .route("/auth/login/", get(login_form).post(login))
        .route("/auth/logout/", get(logout))
}

#[derive(Debug, Default, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

/// Only same-site paths are accepted as a return target.
///
/// Browsers drop tabs and newlines from URLs, so any control or whitespace
/// character could hide a second leading slash and is refused outright.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(|c| c.is_control() || c.is_whitespace()) =>
        {
            path
        }
        _ => urls::INDEX,
    }
}

#[derive(serde::Serialize)]
struct AccountContext<'a> {
    form: FormContext,
    next: &'a str,
}

fn render_signup(values: &SignupForm, errors: FormErrors, next: &str) -> YatubeResult<Rendered> {
    Rendered::new(
        render::SIGNUP,
        AccountContext {
            form: FormContext::signup_form(values, errors),
            next,
        },
    )
}

fn render_login(values: &LoginForm, errors: FormErrors, next: &str) -> YatubeResult<Rendered> {
    Rendered::new(
        render::LOGIN,
        AccountContext {
            form: FormContext::login_form(values, errors),
            next,
        },
    )
}

/// Log `user` in and send them on to `next`.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
    next: &str,
) -> YatubeResult<Response> {
    let token = auth::issue_session_token(
        user.id,
        &user.username,
        &state.settings.jwt_secret,
        state.settings.session_ttl_secs,
    )
    .map_err(|e| YatubeError::Internal(e.into()))?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), render::redirect(next)).into_response())
}

/// GET /auth/signup/
async fn signup_form(Query(query): Query<NextQuery>) -> YatubeResult<Rendered> {
    render_signup(
        &SignupForm::default(),
        FormErrors::new(),
        safe_next(query.next.as_deref()),
    )
}

/// POST /auth/signup/: create an account and log it in.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> YatubeResult<Response> {
    let next = safe_next(query.next.as_deref());
    let form = form.map(|Form(f)| f).unwrap_or_default();

    let mut errors = validate_form(&form).err().unwrap_or_default();
    if errors.field("username").is_empty()
        && users::find_by_username(&state.db.pool, &form.username)
            .await?
            .is_some()
    {
        errors.add("username", DUPLICATE_USERNAME_MESSAGE);
    }
    if !errors.is_empty() {
        return Ok(render_signup(&form, errors, next)?.into_response());
    }

    let password_hash = auth::hash_password(&form.password)
        .map_err(|e| YatubeError::Internal(anyhow::anyhow!("{e}")))?;

    let user = users::create_user(
        &state.db.pool,
        &form.username,
        &form.first_name,
        &form.last_name,
        &password_hash,
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "New user registered");

    start_session(&state, jar, &user, next)
}

/// GET /auth/login/
async fn login_form(Query(query): Query<NextQuery>) -> YatubeResult<Rendered> {
    render_login(
        &LoginForm::default(),
        FormErrors::new(),
        safe_next(query.next.as_deref()),
    )
}

/// POST /auth/login/: check the password and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> YatubeResult<Response> {
    let next = safe_next(query.next.as_deref());
    let form = form.map(|Form(f)| f).unwrap_or_default();

    if let Err(errors) = validate_form(&form) {
        return Ok(render_login(&form, errors, next)?.into_response());
    }

    let user = users::find_by_username(&state.db.pool, &form.username).await?;
    let verified = match &user {
        Some(user) => auth::verify_password(&form.password, &user.password_hash).unwrap_or(false),
        None => false,
    };

    match user {
        Some(user) if verified => {
            tracing::info!(user_id = user.id, username = %user.username, "User logged in");
            start_session(&state, jar, &user, next)
        }
        _ => {
            let mut errors = FormErrors::new();
            errors.add("__all__", BAD_LOGIN_MESSAGE);
            Ok(render_login(&form, errors, next)?.into_response())
        }
    }
}

/// GET /auth/logout/: drop the session cookie.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, render::redirect(urls::INDEX))
}
