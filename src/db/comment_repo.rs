use crate::models::{Comment, CommentDetail};
use chrono::Utc;
use sqlx::SqlitePool;

/// Create a new comment on a post
pub async fn create_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, text, created)
        VALUES (?, ?, ?, ?)
        RETURNING id, post_id, author_id, text, created
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Get all comments for a post in creation order
pub async fn list_comments_by_post(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<CommentDetail>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentDetail>(
        r#"
        SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.text, c.created
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.created ASC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
