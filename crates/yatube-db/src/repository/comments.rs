//! Comment repository.

use chrono::Utc;
use sqlx::SqlitePool;
use yatube_common::models::comment::{Comment, CommentRow, NewComment};

pub async fn create_comment(pool: &SqlitePool, comment: &NewComment) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, text, created)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING *
        "#,
    )
    .bind(comment.post_id())
    .bind(comment.author_id())
    .bind(comment.text())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// All comments on a post, oldest first.
pub async fn list_for_post(pool: &SqlitePool, post_id: i64) -> Result<Vec<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.post_id, c.text, c.created,
               c.author_id,
               u.username   AS author_username,
               u.first_name AS author_first_name,
               u.last_name  AS author_last_name
        FROM comments c
        INNER JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?1
        ORDER BY c.created ASC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn count_for_post(pool: &SqlitePool, post_id: i64) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
