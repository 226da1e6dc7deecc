/// Database access layer
///
/// Repository modules expose free async functions over a `SqlitePool`.
/// Listing queries are finite, restartable SELECTs ordered by publication
/// date; pagination is plain LIMIT/OFFSET driven by the paginator.
pub mod comment_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Create a connection pool and run pending migrations.
///
/// Foreign key enforcement is enabled per connection; the schema relies on
/// it for SET NULL / CASCADE behavior.
pub async fn create_pool(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
