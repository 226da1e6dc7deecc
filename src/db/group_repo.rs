use crate::models::Group;
use sqlx::SqlitePool;

/// Create a new group (administrative action, no handler in scope)
pub async fn create_group(
    pool: &SqlitePool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO post_groups (title, slug, description)
        VALUES (?, ?, ?)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(group)
}

/// Find a group by its slug
pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM post_groups
        WHERE slug = ?
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

/// List all groups ordered by title (used by the post form's group selector)
pub async fn list_groups(pool: &SqlitePool) -> Result<Vec<Group>, sqlx::Error> {
    let groups = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM post_groups
        ORDER BY title ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(groups)
}
