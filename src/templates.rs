/// Embedded Tera template set and render helpers.
///
/// Templates are compiled into the binary with `include_str!` so the server
/// has no runtime dependency on a template directory. The set is validated
/// once at first use; a broken template is a build defect, not a runtime
/// condition.
use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use tera::{Context, Tera};

use crate::error::Result;

pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("pagination.html", include_str!("../templates/pagination.html")),
        ("post_card.html", include_str!("../templates/post_card.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("group.html", include_str!("../templates/group.html")),
        ("profile.html", include_str!("../templates/profile.html")),
        ("post.html", include_str!("../templates/post.html")),
        ("post_new.html", include_str!("../templates/post_new.html")),
        ("signup.html", include_str!("../templates/signup.html")),
        ("login.html", include_str!("../templates/login.html")),
        ("about.html", include_str!("../templates/about.html")),
        ("terms.html", include_str!("../templates/terms.html")),
        ("404.html", include_str!("../templates/404.html")),
        ("500.html", include_str!("../templates/500.html")),
    ])
    .expect("embedded template set must parse");
    tera
});

/// Render a template to a 200 response.
pub fn render(name: &str, ctx: &Context) -> Result<HttpResponse> {
    let body = TEMPLATES.render(name, ctx)?;
    Ok(HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(body))
}

/// The fixed not-found page, optionally carrying the requested path.
pub fn not_found_page(path: Option<&str>) -> HttpResponse {
    let mut ctx = Context::new();
    ctx.insert("path", &path.unwrap_or(""));
    let body = TEMPLATES
        .render("404.html", &ctx)
        .unwrap_or_else(|_| "Page not found".to_string());
    HttpResponse::NotFound()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(body)
}

/// The fixed server-error page; no diagnostic detail is exposed.
pub fn server_error_page() -> HttpResponse {
    let body = TEMPLATES
        .render("500.html", &Context::new())
        .unwrap_or_else(|_| "Server error".to_string());
    HttpResponse::InternalServerError()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(body)
}
