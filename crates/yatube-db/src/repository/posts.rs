//! Post repository: creation, in-place edits and the four feed queries.
//!
//! Every listing is ordered `pub_date DESC, id DESC`, so posts created within
//! the same clock tick still come out newest first.

use chrono::Utc;
use sqlx::SqlitePool;
use yatube_common::models::post::{NewPost, Post, PostChanges, PostRow};

const POST_SELECT: &str = r#"
    SELECT p.id, p.text, p.pub_date, p.image,
           p.author_id,
           u.username   AS author_username,
           u.first_name AS author_first_name,
           u.last_name  AS author_last_name,
           p.group_id,
           g.title AS group_title,
           g.slug  AS group_slug
    FROM posts p
    INNER JOIN users u ON u.id = p.author_id
    LEFT JOIN post_groups g ON g.id = p.group_id
"#;

const NEWEST_FIRST: &str = "ORDER BY p.pub_date DESC, p.id DESC";

/// Which posts a feed shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostFilter {
    All,
    Group(i64),
    Author(i64),
    /// Posts by anyone this user follows.
    FollowedBy(i64),
}

impl PostFilter {
    fn where_clause(&self) -> &'static str {
        match self {
            PostFilter::All => "",
            PostFilter::Group(_) => "WHERE p.group_id = ?1",
            PostFilter::Author(_) => "WHERE p.author_id = ?1",
            PostFilter::FollowedBy(_) => {
                "WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ?1)"
            }
        }
    }

    fn param(&self) -> Option<i64> {
        match *self {
            PostFilter::All => None,
            PostFilter::Group(id) | PostFilter::Author(id) | PostFilter::FollowedBy(id) => Some(id),
        }
    }
}

/// Persist a new post owned by its author.
pub async fn create_post(pool: &SqlitePool, post: &NewPost) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (text, pub_date, author_id, group_id, image)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, text, pub_date, author_id, group_id, image
        "#,
    )
    .bind(post.text())
    .bind(Utc::now())
    .bind(post.author_id())
    .bind(post.group_id())
    .bind(post.image())
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        "SELECT id, text, pub_date, author_id, group_id, image FROM posts WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// A post joined with its author and group.
pub async fn find_row_by_id(pool: &SqlitePool, id: i64) -> Result<Option<PostRow>, sqlx::Error> {
    let sql = format!("{POST_SELECT} WHERE p.id = ?1");
    sqlx::query_as::<_, PostRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Apply an edit. Author and publication date are left as they were.
pub async fn update_post(
    pool: &SqlitePool,
    id: i64,
    changes: &PostChanges,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts SET
            text = ?2,
            group_id = ?3,
            image = ?4
        WHERE id = ?1
        RETURNING id, text, pub_date, author_id, group_id, image
        "#,
    )
    .bind(id)
    .bind(changes.text())
    .bind(changes.group_id())
    .bind(changes.image())
    .fetch_one(pool)
    .await
}

/// Number of posts matching `filter`.
async fn count(pool: &SqlitePool, filter: PostFilter) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM posts p {}", filter.where_clause());
    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    if let Some(param) = filter.param() {
        query = query.bind(param);
    }
    Ok(query.fetch_one(pool).await?.0)
}

/// One window of posts matching `filter`, newest first.
async fn list(
    pool: &SqlitePool,
    filter: PostFilter,
    limit: usize,
    offset: usize,
) -> Result<Vec<PostRow>, sqlx::Error> {
    // SQLite numbers bare `?` independently of `?N`, so the window binds are numbered too.
    let first = if filter.param().is_some() { 2 } else { 1 };
    let sql = format!(
        "{POST_SELECT} {} {NEWEST_FIRST} LIMIT ?{first} OFFSET ?{}",
        filter.where_clause(),
        first + 1
    );
    let mut query = sqlx::query_as::<_, PostRow>(&sql);
    if let Some(param) = filter.param() {
        query = query.bind(param);
    }
    query
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(pool)
        .await
}

/// Total post count (all authors).
pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    count(pool, PostFilter::All).await
}

pub async fn list_all(
    pool: &SqlitePool,
    limit: usize,
    offset: usize,
) -> Result<Vec<PostRow>, sqlx::Error> {
    list(pool, PostFilter::All, limit, offset).await
}

pub async fn count_by_group(pool: &SqlitePool, group_id: i64) -> Result<i64, sqlx::Error> {
    count(pool, PostFilter::Group(group_id)).await
}

pub async fn posts_by_group(
    pool: &SqlitePool,
    group_id: i64,
    limit: usize,
    offset: usize,
) -> Result<Vec<PostRow>, sqlx::Error> {
    list(pool, PostFilter::Group(group_id), limit, offset).await
}

pub async fn count_by_author(pool: &SqlitePool, author_id: i64) -> Result<i64, sqlx::Error> {
    count(pool, PostFilter::Author(author_id)).await
}

pub async fn posts_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: usize,
    offset: usize,
) -> Result<Vec<PostRow>, sqlx::Error> {
    list(pool, PostFilter::Author(author_id), limit, offset).await
}

pub async fn count_by_followed_authors(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    count(pool, PostFilter::FollowedBy(user_id)).await
}

pub async fn posts_by_followed_authors(
    pool: &SqlitePool,
    user_id: i64,
    limit: usize,
    offset: usize,
) -> Result<Vec<PostRow>, sqlx::Error> {
    list(pool, PostFilter::FollowedBy(user_id), limit, offset).await
}
