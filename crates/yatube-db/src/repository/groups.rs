//! Group repository: groups are written by administrators only.

use sqlx::SqlitePool;
use yatube_common::models::group::Group;

/// Create a group (admin CLI and tests).
pub async fn create_group(
    pool: &SqlitePool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO post_groups (title, slug, description)
        VALUES (?1, ?2, ?3)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT * FROM post_groups WHERE slug = ?1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// All groups by title, for the post form's group choices.
pub async fn list_groups(pool: &SqlitePool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT * FROM post_groups ORDER BY title, id")
        .fetch_all(pool)
        .await
}
