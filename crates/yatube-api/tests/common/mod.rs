//! Shared harness: a router over an in-memory database and a temp media dir.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use yatube_api::{AppState, Settings, auth, build_router};
use yatube_common::models::{Group, NewPost, Post, User};
use yatube_db::{
    Database,
    cache::PageCache,
    repository::{groups, posts, users},
    storage::MediaStorage,
};

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _media: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let media = tempfile::tempdir().expect("temp media dir");
        let db = Database::connect_in_memory().await.expect("in-memory database");
        let settings = Settings {
            page_size: 10,
            title_symbols: 30,
            jwt_secret: SECRET.into(),
            session_ttl_secs: 3600,
            index_ttl: Duration::from_secs(20),
        };
        let state = AppState {
            db,
            cache: PageCache::in_memory(settings.index_ttl),
            storage: MediaStorage::new(media.path()),
            settings,
        };
        Self {
            router: build_router(state.clone()),
            state,
            _media: media,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        users::create_user(&self.state.db.pool, username, "", "", "unused")
            .await
            .expect("create user")
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        groups::create_group(&self.state.db.pool, title, slug, "Тестовое описание")
            .await
            .expect("create group")
    }

    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let new = NewPost::new(author.id, text, group.map(|g| g.id), None).unwrap();
        posts::create_post(&self.state.db.pool, &new)
            .await
            .expect("create post")
    }

    pub async fn post_count(&self) -> i64 {
        posts::count_all(&self.state.db.pool).await.unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("router call")
    }

    pub async fn get(&self, path: &str, as_user: Option<&User>) -> Response<Body> {
        self.send(request("GET", path, as_user).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(
        &self,
        path: &str,
        as_user: Option<&User>,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            request("POST", path, as_user)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// GET a page and return its `context`, asserting a 200.
    pub async fn context(&self, path: &str, as_user: Option<&User>) -> Value {
        let resp = self.get(path, as_user).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        let mut page = json(resp).await;
        page["context"].take()
    }
}

pub fn session_cookie(user: &User) -> String {
    let token = auth::issue_session_token(user.id, &user.username, SECRET, 3600).unwrap();
    format!("{}={token}", auth::SESSION_COOKIE)
}

pub fn request(method: &str, path: &str, as_user: Option<&User>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(user) = as_user {
        builder = builder.header(header::COOKIE, session_cookie(user));
    }
    builder
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    resp.into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn json(resp: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("json body")
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

/// Texts of the posts on a listing page.
pub fn listed_texts(context: &Value) -> Vec<String> {
    context["page_obj"]["object_list"]
        .as_array()
        .expect("object_list")
        .iter()
        .map(|p| p["text"].as_str().unwrap().to_string())
        .collect()
}
