//! Repository behaviour against a fresh in-memory SQLite database.

use yatube_common::models::{FollowEdge, NewComment, NewPost, PostChanges, PostView};
use yatube_db::{
    Database,
    repository::{
        comments, follows, groups,
        posts,
        users,
    },
};

async fn db() -> Database {
    Database::connect_in_memory().await.expect("in-memory database")
}

async fn user(db: &Database, name: &str) -> i64 {
    users::create_user(&db.pool, name, "", "", "hash")
        .await
        .expect("create user")
        .id
}

async fn post(db: &Database, author: i64, text: &str, group: Option<i64>) -> i64 {
    let new = NewPost::new(author, text, group, None).unwrap();
    posts::create_post(&db.pool, &new).await.expect("create post").id
}

#[tokio::test]
async fn create_post_keeps_author_and_text() {
    let db = db().await;
    let author = user(&db, "test_user").await;
    let before = posts::count_all(&db.pool).await.unwrap();

    let new = NewPost::new(author, "Данные из формы", None, Some("posts/small.gif".into())).unwrap();
    let created = posts::create_post(&db.pool, &new).await.unwrap();

    assert_eq!(created.author_id, author);
    assert_eq!(created.text, "Данные из формы");
    assert_eq!(created.image.as_deref(), Some("posts/small.gif"));
    assert_eq!(posts::count_all(&db.pool).await.unwrap(), before + 1);
}

#[tokio::test]
async fn update_leaves_author_and_date_alone() {
    let db = db().await;
    let author = user(&db, "author").await;
    let id = post(&db, author, "original", None).await;
    let original = posts::find_by_id(&db.pool, id).await.unwrap().unwrap();

    let changes = PostChanges::new("Измененный текст", None, None).unwrap();
    let updated = posts::update_post(&db.pool, id, &changes).await.unwrap();

    assert_eq!(updated.text, "Измененный текст");
    assert_eq!(updated.author_id, original.author_id);
    assert_eq!(updated.pub_date, original.pub_date);
}

#[tokio::test]
async fn listings_are_newest_first_and_windowed() {
    let db = db().await;
    let author = user(&db, "author").await;
    for i in 0..13 {
        post(&db, author, &format!("post {i}"), None).await;
    }

    let first = posts::list_all(&db.pool, 10, 0).await.unwrap();
    let second = posts::list_all(&db.pool, 10, 10).await.unwrap();

    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 3);
    assert_eq!(first[0].text, "post 12");
    assert_eq!(second[2].text, "post 0");
}

#[tokio::test]
async fn filtered_listings_window_by_limit_and_offset() {
    let db = db().await;
    let author = user(&db, "author").await;
    let group = groups::create_group(&db.pool, "Группа", "g", "").await.unwrap();
    assert_eq!(group.id, 1);
    for i in 0..13 {
        post(&db, author, &format!("post {i}"), Some(group.id)).await;
    }

    assert_eq!(posts::count_by_group(&db.pool, group.id).await.unwrap(), 13);
    let first = posts::posts_by_group(&db.pool, group.id, 10, 0).await.unwrap();
    let second = posts::posts_by_group(&db.pool, group.id, 10, 10).await.unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 3);
    assert_eq!(first[0].text, "post 12");
    assert_eq!(second[2].text, "post 0");

    let by_author = posts::posts_by_author(&db.pool, author, 3, 1).await.unwrap();
    let texts: Vec<_> = by_author.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["post 11", "post 10", "post 9"]);
}

#[tokio::test]
async fn group_filter_only_returns_group_posts() {
    let db = db().await;
    let author = user(&db, "author").await;
    let group = groups::create_group(&db.pool, "Заголовок", "test_slug", "")
        .await
        .unwrap();
    let empty = groups::create_group(&db.pool, "Пустая", "empty", "").await.unwrap();
    post(&db, author, "in group", Some(group.id)).await;
    post(&db, author, "no group", None).await;

    let rows = posts::posts_by_group(&db.pool, group.id, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    let view = PostView::from(rows[0].clone());
    assert_eq!(view.group.unwrap().slug, "test_slug");

    assert_eq!(posts::count_by_group(&db.pool, empty.id).await.unwrap(), 0);
    assert!(posts::posts_by_group(&db.pool, empty.id, 10, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn follow_feed_contains_only_followed_authors() {
    let db = db().await;
    let reader = user(&db, "reader").await;
    let followed = user(&db, "followed").await;
    let other = user(&db, "other").await;
    post(&db, followed, "followed post", None).await;
    post(&db, other, "other post", None).await;

    assert_eq!(posts::count_by_followed_authors(&db.pool, reader).await.unwrap(), 0);

    let edge = FollowEdge::new(reader, followed).unwrap();
    assert!(follows::create_follow(&db.pool, &edge).await.unwrap());

    let feed = posts::posts_by_followed_authors(&db.pool, reader, 10, 0).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].text, "followed post");

    assert_eq!(posts::count_by_followed_authors(&db.pool, reader).await.unwrap(), 1);

    let others_feed = posts::posts_by_followed_authors(&db.pool, other, 10, 0).await.unwrap();
    assert!(others_feed.is_empty());
}

#[tokio::test]
async fn author_listing_only_has_their_posts() {
    let db = db().await;
    let author = user(&db, "author").await;
    let other = user(&db, "other").await;
    post(&db, author, "mine", None).await;
    post(&db, other, "theirs", None).await;

    let rows = posts::posts_by_author(&db.pool, author, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].author_username, "author");
    assert_eq!(posts::count_by_author(&db.pool, author).await.unwrap(), 1);
}

#[tokio::test]
async fn groups_are_listed_and_found_by_slug() {
    let db = db().await;
    groups::create_group(&db.pool, "Б", "b", "").await.unwrap();
    groups::create_group(&db.pool, "А", "a", "").await.unwrap();

    assert_eq!(groups::list_groups(&db.pool).await.unwrap().len(), 2);
    assert_eq!(groups::find_by_slug(&db.pool, "a").await.unwrap().unwrap().title, "А");
    assert!(groups::find_by_slug(&db.pool, "missing").await.unwrap().is_none());
    assert!(groups::create_group(&db.pool, "dup", "a", "").await.is_err());
}

#[tokio::test]
async fn follow_edges_are_unique() {
    let db = db().await;
    let a = user(&db, "a").await;
    let b = user(&db, "b").await;
    let edge = FollowEdge::new(a, b).unwrap();

    assert!(follows::create_follow(&db.pool, &edge).await.unwrap());
    assert!(!follows::create_follow(&db.pool, &edge).await.unwrap());
    assert_eq!(follows::count_followers(&db.pool, b).await.unwrap(), 1);
    assert_eq!(follows::count_following(&db.pool, a).await.unwrap(), 1);

    assert!(follows::delete_follow(&db.pool, a, b).await.unwrap());
    assert!(!follows::delete_follow(&db.pool, a, b).await.unwrap());
    assert!(!follows::exists(&db.pool, a, b).await.unwrap());
}

#[tokio::test]
async fn store_rejects_self_follow() {
    let db = db().await;
    let a = user(&db, "a").await;
    let result = sqlx::query("INSERT INTO follows (user_id, author_id, created) VALUES (?1, ?1, '2024-01-01 00:00:00')")
        .bind(a)
        .execute(&db.pool)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn comments_come_back_in_order() {
    let db = db().await;
    let author = user(&db, "author").await;
    let reader = user(&db, "reader").await;
    let id = post(&db, author, "post", None).await;

    for text in ["первый", "второй"] {
        let c = NewComment::new(id, reader, text).unwrap();
        comments::create_comment(&db.pool, &c).await.unwrap();
    }

    let rows = comments::list_for_post(&db.pool, id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text, "первый");
    assert_eq!(rows[1].author_username, "reader");
    assert_eq!(comments::count_for_post(&db.pool, id).await.unwrap(), 2);
}

#[tokio::test]
async fn usernames_are_unique() {
    let db = db().await;
    user(&db, "dup").await;
    assert!(users::create_user(&db.pool, "dup", "", "", "hash").await.is_err());
    assert_eq!(users::count_users(&db.pool).await.unwrap(), 1);
    assert!(users::find_by_username(&db.pool, "dup").await.unwrap().is_some());
}
