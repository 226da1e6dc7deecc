//! Route configuration
//!
//! The URL surface, in matching order: fixed pages first, the auth scope,
//! then the username-prefixed routes last so they cannot shadow anything.
use actix_web::web;

use crate::auth;
use crate::handlers;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::posts::index))
        .route("/new/", web::get().to(handlers::posts::new_post_form))
        .route("/new/", web::post().to(handlers::posts::new_post))
        .route("/group/{slug}/", web::get().to(handlers::posts::group_posts))
        .route("/about-us/", web::get().to(handlers::pages::about))
        .route("/terms/", web::get().to(handlers::pages::terms))
        .service(
            web::scope("/auth")
                .route("/signup/", web::get().to(auth::signup_form))
                .route("/signup/", web::post().to(auth::signup))
                .route("/login/", web::get().to(auth::login_form))
                .route("/login/", web::post().to(auth::login))
                .route("/logout/", web::get().to(auth::logout)),
        )
        .route("/{username}/", web::get().to(handlers::posts::profile))
        .route(
            "/{username}/{post_id}/",
            web::get().to(handlers::posts::post_view),
        )
        .route(
            "/{username}/{post_id}/edit/",
            web::get().to(handlers::posts::post_edit_form),
        )
        .route(
            "/{username}/{post_id}/edit/",
            web::post().to(handlers::posts::post_edit),
        )
        .route(
            "/{username}/{post_id}/comment/",
            web::post().to(handlers::comments::add_comment),
        );
}
