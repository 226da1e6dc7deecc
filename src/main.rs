use actix_files::Files;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use blog_service::{db, handlers, routes, Config};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let pool = db::create_pool(&config.database.url, config.database.max_connections).await?;

    let session_key = Key::derive_from(config.session.secret_key.as_bytes());
    let cookie_secure = config.session.cookie_secure;
    let media_root = config.media.root.clone();
    let serve_media = config.media.serve_media;
    let bind_addr = (config.server.host.clone(), config.server.port);

    tracing::info!(
        host = %bind_addr.0,
        port = bind_addr.1,
        database = %config.database.url,
        "starting blog-service"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(cookie_secure)
                    .build(),
            )
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(routes::configure_routes)
            .configure(|cfg| {
                if serve_media {
                    cfg.service(Files::new("/media", media_root.clone()));
                }
            })
            .default_service(web::route().to(handlers::pages::page_not_found))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
