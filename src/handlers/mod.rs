/// HTTP handlers for the page routes
///
/// - `posts`: listings (index, group, profile), post page, create and edit
/// - `comments`: comment creation
/// - `pages`: flat informational pages and the not-found handler
pub mod comments;
pub mod pages;
pub mod posts;

use actix_web::http::header;
use actix_web::HttpResponse;
use tera::Context;

use crate::auth::MaybeUser;
use crate::error::{AppError, Result};

/// 302 to `location`, the response every successful mutation ends with.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Context shared by every rendered page (navbar identity).
pub(crate) fn base_context(user: &MaybeUser) -> Context {
    let mut ctx = Context::new();
    ctx.insert("user", &user.0);
    ctx
}

/// Path post ids are parsed by hand so a non-numeric id is an ordinary
/// not-found, the same as an unknown one.
pub(crate) fn parse_post_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("post {raw}")))
}
