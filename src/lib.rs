/// blog-service library
///
/// A small social blogging site: users publish posts, organize them into
/// groups, comment on posts, and browse paginated feeds (global, per-group,
/// per-author). Server-rendered pages, session-cookie authentication, one
/// SQLite database.
///
/// # Modules
///
/// - `handlers`: page request handlers
/// - `auth`: session identity, login/signup/logout
/// - `forms`: form intake and validation
/// - `models`: row structs and joined read models
/// - `db`: pool setup and repositories
/// - `pagination`: fixed-size paginator for the listings
/// - `templates`: embedded template set
/// - `routes`: URL table
/// - `error`: error types and page rendering
/// - `config`: configuration management
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod templates;

pub use config::Config;
pub use error::{AppError, Result};
