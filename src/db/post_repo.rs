use crate::models::{Post, PostDetail};
use chrono::Utc;
use sqlx::SqlitePool;

const DETAIL_COLUMNS: &str = r#"
    p.id, p.text, p.pub_date, p.author_id, u.username AS author_username,
    p.group_id, g.title AS group_title, g.slug AS group_slug, p.image
"#;

/// Create a new post. `pub_date` is stamped here, exactly once; edits never
/// touch it.
pub async fn create_post(
    pool: &SqlitePool,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (text, pub_date, author_id, group_id, image)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, text, pub_date, author_id, group_id, image
        "#,
    )
    .bind(text)
    .bind(Utc::now())
    .bind(author_id)
    .bind(group_id)
    .bind(image)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &SqlitePool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, text, pub_date, author_id, group_id, image
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID and author username together; a mismatched pair is
/// simply not found.
pub async fn find_post_detail(
    pool: &SqlitePool,
    post_id: i64,
    author_username: &str,
) -> Result<Option<PostDetail>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN post_groups g ON g.id = p.group_id
        WHERE p.id = ? AND u.username = ?
        "#
    );

    let post = sqlx::query_as::<_, PostDetail>(&query)
        .bind(post_id)
        .bind(author_username)
        .fetch_optional(pool)
        .await?;

    Ok(post)
}

/// Update the editable fields of a post. Author and publication date are
/// deliberately not part of this statement.
pub async fn update_post(
    pool: &SqlitePool,
    post_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET text = ?, group_id = ?, image = COALESCE(?, image)
        WHERE id = ?
        "#,
    )
    .bind(text)
    .bind(group_id)
    .bind(image)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all posts, newest first
pub async fn list_posts(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN post_groups g ON g.id = p.group_id
        ORDER BY p.pub_date DESC, p.id DESC
        LIMIT ? OFFSET ?
        "#
    );

    let posts = sqlx::query_as::<_, PostDetail>(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(posts)
}

/// Count all posts
pub async fn count_posts(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List posts belonging to a group, newest first
pub async fn list_posts_by_group(
    pool: &SqlitePool,
    group_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN post_groups g ON g.id = p.group_id
        WHERE p.group_id = ?
        ORDER BY p.pub_date DESC, p.id DESC
        LIMIT ? OFFSET ?
        "#
    );

    let posts = sqlx::query_as::<_, PostDetail>(&query)
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(posts)
}

/// Count posts belonging to a group
pub async fn count_posts_by_group(pool: &SqlitePool, group_id: i64) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = ?")
        .bind(group_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List posts by an author, newest first
pub async fn list_posts_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN post_groups g ON g.id = p.group_id
        WHERE p.author_id = ?
        ORDER BY p.pub_date DESC, p.id DESC
        LIMIT ? OFFSET ?
        "#
    );

    let posts = sqlx::query_as::<_, PostDetail>(&query)
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(posts)
}

/// Count posts by an author
pub async fn count_posts_by_author(pool: &SqlitePool, author_id: i64) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
