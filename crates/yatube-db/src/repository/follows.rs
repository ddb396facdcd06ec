//! Follow repository: reader → author edges.
//!
//! The table itself rejects duplicate pairs and self-follows, so these
//! functions stay correct even when called without the handler checks.

use chrono::Utc;
use sqlx::SqlitePool;
use yatube_common::models::follow::FollowEdge;

/// Whether `user_id` follows `author_id`.
pub async fn exists(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = ?1 AND author_id = ?2)",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0 != 0)
}

/// Insert the edge unless it already exists. Returns `true` if a row was added.
pub async fn create_follow(pool: &SqlitePool, edge: &FollowEdge) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (user_id, author_id, created)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (user_id, author_id) DO NOTHING
        "#,
    )
    .bind(edge.user_id())
    .bind(edge.author_id())
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Remove the edge. Returns `true` if one existed.
pub async fn delete_follow(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id = ?1 AND author_id = ?2")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// How many readers follow `author_id`.
pub async fn count_followers(pool: &SqlitePool, author_id: i64) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE author_id = ?1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// How many authors `user_id` follows.
pub async fn count_following(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE user_id = ?1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
