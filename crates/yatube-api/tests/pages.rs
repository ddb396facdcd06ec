//! Read-only pages: listings, pagination, detail and the index cache.

mod common;

use axum::http::StatusCode;
use common::{TestApp, body_bytes, listed_texts};

#[tokio::test]
async fn index_lists_posts_newest_first() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    app.post(&author, "first", None).await;
    app.post(&author, "second", None).await;

    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = common::json(resp).await;

    assert_eq!(page["template"], "posts/index.html");
    assert_eq!(listed_texts(&page["context"]), vec!["second", "first"]);
    assert_eq!(page["context"]["page_obj"]["object_list"][0]["author"]["username"], "auth");
}

#[tokio::test]
async fn thirteen_posts_split_ten_and_three() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    let group = app.group("Заголовок для тестовой группы", "test_slug").await;
    for i in 0..13 {
        app.post(&author, &format!("Тестовый пост {i}"), Some(&group)).await;
    }

    for base in ["/", "/group/test_slug/", "/profile/auth/"] {
        let first = app.context(base, None).await;
        assert_eq!(listed_texts(&first).len(), 10, "{base}");
        assert_eq!(first["page_obj"]["has_next"], true);
        assert_eq!(first["page_obj"]["num_pages"], 2);

        let second = app.context(&format!("{base}?page=2"), None).await;
        assert_eq!(listed_texts(&second).len(), 3, "{base}");
        assert_eq!(second["page_obj"]["has_previous"], true);
        assert_eq!(second["page_obj"]["has_next"], false);
    }
}

#[tokio::test]
async fn out_of_range_pages_clamp() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    for i in 0..13 {
        app.post(&author, &format!("post {i}"), None).await;
    }

    for raw in ["3", "99999999999999999999"] {
        let past_end = app.context(&format!("/profile/auth/?page={raw}"), None).await;
        assert_eq!(past_end["page_obj"]["number"], 2, "page={raw}");
        assert_eq!(listed_texts(&past_end).len(), 3);
    }

    for raw in ["0", "-1", "abc", ""] {
        let ctx = app.context(&format!("/profile/auth/?page={raw}"), None).await;
        assert_eq!(ctx["page_obj"]["number"], 1, "page={raw}");
        assert_eq!(listed_texts(&ctx).len(), 10);
    }
}

#[tokio::test]
async fn group_page_shows_its_post_once() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    let group = app.group("Заголовок для тестовой группы", "test_slug").await;
    app.post(&author, "Тестовая запись", Some(&group)).await;
    app.post(&author, "Без группы", None).await;

    let resp = app.get("/group/test_slug/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = common::json(resp).await;
    let ctx = &page["context"];

    assert_eq!(page["template"], "posts/group_list.html");
    assert_eq!(ctx["group"]["title"], "Заголовок для тестовой группы");
    assert_eq!(listed_texts(ctx), vec!["Тестовая запись"]);
    assert_eq!(ctx["page_obj"]["object_list"][0]["group"]["slug"], "test_slug");
}

#[tokio::test]
async fn empty_group_is_an_empty_page() {
    let app = TestApp::new().await;
    app.group("Пустая группа", "empty").await;

    let ctx = app.context("/group/empty/", None).await;
    assert!(listed_texts(&ctx).is_empty());
    assert_eq!(ctx["page_obj"]["number"], 1);
    assert_eq!(ctx["page_obj"]["num_pages"], 1);
}

#[tokio::test]
async fn unknown_things_are_404() {
    let app = TestApp::new().await;
    for path in [
        "/group/nope/",
        "/profile/nobody/",
        "/posts/999/",
        "/posts/abc/",
        "/unexisting_page/",
    ] {
        assert_eq!(app.get(path, None).await.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn profile_reports_counts_and_following() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    let reader = app.user("reader").await;
    app.post(&author, "one", None).await;
    app.post(&author, "two", None).await;

    let anonymous = app.context("/profile/auth/", None).await;
    assert_eq!(anonymous["posts_count"], 2);
    assert_eq!(anonymous["following"], false);
    assert_eq!(anonymous["author"]["username"], "auth");

    app.get("/profile/auth/follow/", Some(&reader)).await;
    let as_reader = app.context("/profile/auth/", Some(&reader)).await;
    assert_eq!(as_reader["following"], true);
    assert_eq!(as_reader["followers_count"], 1);
    assert_eq!(as_reader["following_count"], 0);
}

#[tokio::test]
async fn post_detail_has_title_count_and_comments() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    let text = "Очень длинный текст тестового поста, длиннее тридцати символов";
    let post = app.post(&author, text, None).await;
    app.post(&author, "another", None).await;

    let path = format!("/posts/{}/", post.id);
    app.post_form(&format!("{path}comment/"), Some(&author), &[("text", "Первый")])
        .await;
    app.post_form(&format!("{path}comment/"), Some(&author), &[("text", "Второй")])
        .await;

    let ctx = app.context(&path, None).await;
    assert_eq!(ctx["post"]["id"], post.id);
    assert_eq!(ctx["posts_count"], 2);
    assert_eq!(ctx["title"].as_str().unwrap().chars().count(), 30);
    assert_eq!(ctx["comments"][0]["text"], "Первый");
    assert_eq!(ctx["comments"][1]["text"], "Второй");
    assert_eq!(ctx["form"]["fields"][0]["name"], "text");
}

#[tokio::test]
async fn index_is_cached_until_invalidated() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    app.post(&author, "before", None).await;

    let first = body_bytes(app.get("/", None).await).await;

    // A write that bypasses the handlers leaves the cached page alone.
    app.post(&author, "written behind the cache", None).await;
    let second = body_bytes(app.get("/", None).await).await;
    assert_eq!(first, second);

    app.state.cache.clear().await.unwrap();
    let third = body_bytes(app.get("/", None).await).await;
    assert_ne!(first, third);
}

#[tokio::test]
async fn creating_a_post_refreshes_the_index() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;

    let before = app.context("/", None).await;
    assert!(listed_texts(&before).is_empty());

    app.post_form("/create/", Some(&author), &[("text", "Свежий пост")])
        .await;

    let after = app.context("/", None).await;
    assert_eq!(listed_texts(&after), vec!["Свежий пост"]);
}

#[tokio::test]
async fn editing_a_post_refreshes_the_index() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    let post = app.post(&author, "Старый текст", None).await;

    let before = app.context("/", None).await;
    assert_eq!(listed_texts(&before), vec!["Старый текст"]);

    let resp = app
        .post_form(
            &format!("/posts/{}/edit/", post.id),
            Some(&author),
            &[("text", "Новый текст")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let after = app.context("/", None).await;
    assert_eq!(listed_texts(&after), vec!["Новый текст"]);
}

#[tokio::test]
async fn commenting_refreshes_the_index() {
    let app = TestApp::new().await;
    let author = app.user("auth").await;
    let post = app.post(&author, "Пост", None).await;

    let first = body_bytes(app.get("/", None).await).await;

    // Lands in the store only; the cached page must still be served.
    app.post(&author, "Второй пост", None).await;
    assert_eq!(body_bytes(app.get("/", None).await).await, first);

    app.post_form(
        &format!("/posts/{}/comment/", post.id),
        Some(&author),
        &[("text", "Комментарий")],
    )
    .await;

    let after = app.context("/", None).await;
    assert_eq!(listed_texts(&after), vec!["Второй пост", "Пост"]);
}

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;
    let resp = app.get("/health/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(common::json(resp).await["status"], "healthy");
}
