/// Flat informational pages and error handlers.
use actix_web::{HttpRequest, HttpResponse};

use crate::auth::MaybeUser;
use crate::error::Result;
use crate::handlers::base_context;
use crate::templates;

/// GET /about-us/
pub async fn about(user: MaybeUser) -> Result<HttpResponse> {
    templates::render("about.html", &base_context(&user))
}

/// GET /terms/
pub async fn terms(user: MaybeUser) -> Result<HttpResponse> {
    templates::render("terms.html", &base_context(&user))
}

/// Default service: any unmatched route gets the fixed not-found page with
/// the requested path for diagnostics.
pub async fn page_not_found(req: HttpRequest) -> HttpResponse {
    templates::not_found_page(Some(req.path()))
}
