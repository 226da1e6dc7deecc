/// Configuration management for blog-service
///
/// Settings come from environment variables (a `.env` file is honored in
/// `main`), with development defaults for everything.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Uploaded media settings
    pub media: MediaConfig,
    /// Session cookie settings
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory where uploaded images are stored
    pub root: String,
    /// Serve /media/ from this process (development convenience; a fronting
    /// web server owns it otherwise)
    pub serve_media: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie; must be set in production
    pub secret_key: String,
    /// Mark the session cookie Secure (requires HTTPS)
    pub cookie_secure: bool,
}

const DEV_SECRET_KEY: &str =
    "insecure-dev-session-secret-insecure-dev-session-secret-insecure-dev";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let secret_key = match std::env::var("SESSION_SECRET_KEY") {
            Ok(value) => value,
            Err(_) if production => {
                return Err("SESSION_SECRET_KEY must be set in production".to_string())
            }
            Err(_) => DEV_SECRET_KEY.to_string(),
        };
        if secret_key.len() < 32 {
            return Err("SESSION_SECRET_KEY must be at least 32 bytes".to_string());
        }

        Ok(Config {
            server: ServerConfig {
                host: std::env::var("BLOG_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("BLOG_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://blog.db".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(5),
            },
            media: MediaConfig {
                root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
                serve_media: std::env::var("SERVE_MEDIA")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(!production),
            },
            session: SessionConfig {
                secret_key,
                cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(production),
            },
        })
    }
}
