use crate::models::User;
use chrono::Utc;
use sqlx::SqlitePool;

/// Create a new user with an already-hashed password
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, created_at)
        VALUES (?, ?, ?)
        RETURNING id, username, password_hash, created_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Find a user by username
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
