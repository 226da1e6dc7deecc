/// Session-based authentication.
///
/// Identity lives in a signed session cookie holding the user id and
/// username. Handlers take the actor through the `CurrentUser` extractor;
/// a request without a session is answered with the standard
/// redirect-to-login, so no handler carries its own authentication check.
use std::future::{ready, Ready};

use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tera::Context;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::templates;

const SESSION_USER_ID: &str = "user_id";
const SESSION_USERNAME: &str = "username";

/// The authenticated actor, taken from the session cookie.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Optional actor for public pages (navbar state).
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

fn read_identity(req: &HttpRequest) -> Option<CurrentUser> {
    let session = req.get_session();
    let id = session.get::<i64>(SESSION_USER_ID).ok()??;
    let username = session.get::<String>(SESSION_USERNAME).ok()??;
    Some(CurrentUser { id, username })
}

/// Rejection for unauthenticated access: a redirect to the login page, not
/// an error page.
#[derive(Debug, thiserror::Error)]
#[error("login required")]
pub struct LoginRequired {
    next: String,
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((
                header::LOCATION,
                format!("/auth/login/?next={}", self.next),
            ))
            .finish()
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match read_identity(req) {
            Some(user) => ready(Ok(user)),
            None => ready(Err(LoginRequired {
                next: req.path().to_string(),
            }
            .into())),
        }
    }
}

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(read_identity(req))))
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

fn valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 150
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn auth_context(username: &str, error: Option<&str>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("username", username);
    ctx.insert("error", &error);
    ctx
}

/// GET /auth/signup/
pub async fn signup_form() -> Result<HttpResponse> {
    templates::render("signup.html", &auth_context("", None))
}

/// POST /auth/signup/
pub async fn signup(
    pool: web::Data<SqlitePool>,
    form: web::Form<Credentials>,
) -> Result<HttpResponse> {
    let username = form.username.trim();

    if !valid_username(username) {
        return templates::render(
            "signup.html",
            &auth_context(
                username,
                Some("Usernames may contain letters, digits, '_' and '-'."),
            ),
        );
    }
    if form.password.len() < 4 {
        return templates::render(
            "signup.html",
            &auth_context(username, Some("Password is too short.")),
        );
    }
    if user_repo::find_by_username(&pool, username).await?.is_some() {
        return templates::render(
            "signup.html",
            &auth_context(username, Some("That username is taken.")),
        );
    }

    let password_hash = bcrypt::hash(&form.password, bcrypt::DEFAULT_COST)?;
    let user = user_repo::create_user(&pool, username, &password_hash).await?;
    tracing::info!(user_id = user.id, username = %user.username, "user signed up");

    Ok(redirect("/auth/login/"))
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> Result<HttpResponse> {
    let mut ctx = auth_context("", None);
    ctx.insert("next", &query.next.as_deref().unwrap_or(""));
    templates::render("login.html", &ctx)
}

/// POST /auth/login/
pub async fn login(
    pool: web::Data<SqlitePool>,
    session: Session,
    query: web::Query<NextQuery>,
    form: web::Form<Credentials>,
) -> Result<HttpResponse> {
    let username = form.username.trim();

    let user = user_repo::find_by_username(&pool, username).await?;
    let verified = match &user {
        Some(user) => bcrypt::verify(&form.password, &user.password_hash)?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        let mut ctx = auth_context(username, Some("Invalid username or password."));
        ctx.insert("next", &query.next.as_deref().unwrap_or(""));
        return templates::render("login.html", &ctx);
    };

    session
        .insert(SESSION_USER_ID, user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    session
        .insert(SESSION_USERNAME, user.username.clone())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!(user_id = user.id, username = %user.username, "user logged in");

    // Local paths only; a protocol-relative "//host" would leave the site
    let next = query
        .next
        .as_deref()
        .filter(|n| n.starts_with('/') && !n.starts_with("//"));
    Ok(redirect(next.unwrap_or("/")))
}

/// GET /auth/logout/
pub async fn logout(session: Session) -> Result<HttpResponse> {
    session.purge();
    Ok(redirect("/"))
}
