/// Data models for blog-service
///
/// This module defines structures for:
/// - User: registered accounts, referenced by posts and comments as author
/// - Group: slug-identified categories that posts may belong to
/// - Post: timestamped text entries, optionally grouped, optionally with an image
/// - Comment: text entries attached permanently to one post
///
/// `PostDetail` and `CommentDetail` are the joined read models used by the
/// page handlers; they carry the author username (and group title/slug) so a
/// listing is a single query.
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Post joined with its author username and (optional) group columns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub image: Option<String>,
}

/// Comment joined with its author username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentDetail {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub created: DateTime<Utc>,
}
