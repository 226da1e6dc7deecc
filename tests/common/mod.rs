//! Shared fixtures and app harness for the integration tests.
//!
//! Every test gets its own single-connection in-memory SQLite pool with the
//! migrations applied, and an app instance wired exactly like `main` minus
//! media file serving.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::str::FromStr;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use blog_service::config::{Config, DatabaseConfig, MediaConfig, ServerConfig, SessionConfig};
use blog_service::db::{group_repo, post_repo, user_repo};
use blog_service::models::{Group, Post, User};
use blog_service::{handlers, routes};

/// Password shared by all fixture users
pub const TEST_PASSWORD: &str = "correct-horse";

const TEST_SECRET: &str = "test-session-secret-test-session-secret-test-session-secret-test";

pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("memory database options")
        .foreign_keys(true);

    // One connection, or each pool checkout would see its own empty database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("connect to in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

pub fn test_config(media_root: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        media: MediaConfig {
            root: media_root.to_string(),
            serve_media: false,
        },
        session: SessionConfig {
            secret_key: TEST_SECRET.to_string(),
            cookie_secure: false,
        },
    }
}

pub async fn setup_test_app(
    pool: SqlitePool,
    config: Config,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .wrap(
                SessionMiddleware::builder(
                    CookieSessionStore::default(),
                    Key::derive_from(TEST_SECRET.as_bytes()),
                )
                .cookie_secure(false)
                .build(),
            )
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(config))
            .configure(routes::configure_routes)
            .default_service(web::route().to(handlers::pages::page_not_found)),
    )
    .await
}

// ============================================
// Fixtures
// ============================================

pub async fn create_test_user(pool: &SqlitePool, username: &str) -> User {
    // Minimum bcrypt cost keeps the suite fast
    let hash = bcrypt::hash(TEST_PASSWORD, 4).expect("hash test password");
    user_repo::create_user(pool, username, &hash)
        .await
        .expect("create test user")
}

pub async fn create_test_group(pool: &SqlitePool, slug: &str) -> Group {
    group_repo::create_group(pool, &slug.to_uppercase(), slug, "test group")
        .await
        .expect("create test group")
}

pub async fn create_test_post(
    pool: &SqlitePool,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
) -> Post {
    post_repo::create_post(pool, author_id, text, group_id, None)
        .await
        .expect("create test post")
}

/// Insert a post with an explicit publication date (fixtures only; the
/// application stamps pub_date itself).
pub async fn create_test_post_at(
    pool: &SqlitePool,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
    pub_date: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO posts (text, pub_date, author_id, group_id, image) \
         VALUES (?, ?, ?, ?, NULL) RETURNING id",
    )
    .bind(text)
    .bind(pub_date)
    .bind(author_id)
    .bind(group_id)
    .fetch_one(pool)
    .await
    .expect("insert dated post")
}

// ============================================
// Request helpers
// ============================================

/// Log in through the real login route and hand back the session cookie.
pub async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", username), ("password", TEST_PASSWORD)])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND, "login should redirect");

    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .expect("session cookie in login response")
        .into_owned()
}

pub const BOUNDARY: &str = "----testformboundary7MA4YWxk";

/// Build a multipart/form-data body from text fields and an optional file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Read a response body into a string.
pub async fn read_html(resp: ServiceResponse) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

/// Number of rendered post cards in a listing page.
pub fn count_posts(html: &str) -> usize {
    html.matches("<article class=\"post\"").count()
}
