/// Post handlers: paginated listings, the post page, create and edit.
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, MaybeUser};
use crate::config::Config;
use crate::db::{comment_repo, group_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::forms::{self, CommentFormState, PostFormState, PostSubmission};
use crate::handlers::{base_context, parse_post_id, redirect};
use crate::pagination::{PageQuery, Paginator, PAGE_SIZE};
use crate::templates;

/// GET /
pub async fn index(
    pool: web::Data<SqlitePool>,
    user: MaybeUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let total = post_repo::count_posts(&pool).await?;
    let paginator = Paginator::new(total, PAGE_SIZE);
    let number = paginator.resolve_page(query.page.as_deref());
    let posts = post_repo::list_posts(&pool, paginator.per_page, paginator.offset(number)).await?;

    let mut ctx = base_context(&user);
    ctx.insert("page", &paginator.page(number, posts));
    ctx.insert("paginator", &paginator);
    templates::render("index.html", &ctx)
}

/// GET /group/{slug}/
pub async fn group_posts(
    pool: web::Data<SqlitePool>,
    user: MaybeUser,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let group = group_repo::find_by_slug(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group {slug}")))?;

    let total = post_repo::count_posts_by_group(&pool, group.id).await?;
    let paginator = Paginator::new(total, PAGE_SIZE);
    let number = paginator.resolve_page(query.page.as_deref());
    let posts =
        post_repo::list_posts_by_group(&pool, group.id, paginator.per_page, paginator.offset(number))
            .await?;

    let mut ctx = base_context(&user);
    ctx.insert("group", &group);
    ctx.insert("page", &paginator.page(number, posts));
    ctx.insert("paginator", &paginator);
    templates::render("group.html", &ctx)
}

/// GET /{username}/
pub async fn profile(
    pool: web::Data<SqlitePool>,
    user: MaybeUser,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let author = user_repo::find_by_username(&pool, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;

    let total = post_repo::count_posts_by_author(&pool, author.id).await?;
    let paginator = Paginator::new(total, PAGE_SIZE);
    let number = paginator.resolve_page(query.page.as_deref());
    let posts = post_repo::list_posts_by_author(
        &pool,
        author.id,
        paginator.per_page,
        paginator.offset(number),
    )
    .await?;

    let mut ctx = base_context(&user);
    ctx.insert("author_posts", &author);
    ctx.insert("page", &paginator.page(number, posts));
    ctx.insert("paginator", &paginator);
    templates::render("profile.html", &ctx)
}

/// GET /{username}/{post_id}/
pub async fn post_view(
    pool: web::Data<SqlitePool>,
    user: MaybeUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, raw_id) = path.into_inner();
    let post_id = parse_post_id(&raw_id)?;

    let post = post_repo::find_post_detail(&pool, post_id, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))?;
    let author = user_repo::find_by_username(&pool, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;
    let comments = comment_repo::list_comments_by_post(&pool, post.id).await?;

    let mut ctx = base_context(&user);
    ctx.insert("post", &post);
    ctx.insert("author_posts", &author);
    ctx.insert("comments", &comments);
    ctx.insert("form", &CommentFormState::empty());
    templates::render("post.html", &ctx)
}

/// GET /new/
pub async fn new_post_form(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let groups = group_repo::list_groups(&pool).await?;

    let mut ctx = base_context(&MaybeUser(Some(user)));
    ctx.insert("form", &PostFormState::empty());
    ctx.insert("groups", &groups);
    ctx.insert("is_edit", &false);
    templates::render("post_new.html", &ctx)
}

/// POST /new/
pub async fn new_post(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let submission = PostSubmission::read(payload).await?;
    let groups = group_repo::list_groups(&pool).await?;

    match forms::validate_post(submission, &groups) {
        Ok(valid) => {
            let image = match &valid.image {
                Some(upload) => Some(upload.save(&config.media.root).await?),
                None => None,
            };
            let post =
                post_repo::create_post(&pool, user.id, &valid.text, valid.group_id, image.as_deref())
                    .await?;
            tracing::info!(post_id = post.id, author = %user.username, "post created");
            Ok(redirect("/"))
        }
        Err(form) => {
            let mut ctx = base_context(&MaybeUser(Some(user)));
            ctx.insert("form", &form);
            ctx.insert("groups", &groups);
            ctx.insert("is_edit", &false);
            templates::render("post_new.html", &ctx)
        }
    }
}

/// GET /{username}/{post_id}/edit/
///
/// A non-owner is sent back to the read-only post page, silently.
pub async fn post_edit_form(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, raw_id) = path.into_inner();
    let post_id = parse_post_id(&raw_id)?;

    if user.username != username {
        return Ok(redirect(&format!("/{username}/{post_id}/")));
    }

    let post = post_repo::find_post_detail(&pool, post_id, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))?;
    let groups = group_repo::list_groups(&pool).await?;

    let mut ctx = base_context(&MaybeUser(Some(user)));
    ctx.insert("form", &PostFormState::prefill(&post.text, post.group_id));
    ctx.insert("post", &post);
    ctx.insert("groups", &groups);
    ctx.insert("is_edit", &true);
    templates::render("post_new.html", &ctx)
}

/// POST /{username}/{post_id}/edit/
pub async fn post_edit(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let (username, raw_id) = path.into_inner();
    let post_id = parse_post_id(&raw_id)?;

    if user.username != username {
        return Ok(redirect(&format!("/{username}/{post_id}/")));
    }

    let post = post_repo::find_post_detail(&pool, post_id, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))?;

    let submission = PostSubmission::read(payload).await?;
    let groups = group_repo::list_groups(&pool).await?;

    match forms::validate_post(submission, &groups) {
        Ok(valid) => {
            // A new upload replaces the image; otherwise the old one stays.
            let image = match &valid.image {
                Some(upload) => Some(upload.save(&config.media.root).await?),
                None => None,
            };
            post_repo::update_post(&pool, post.id, &valid.text, valid.group_id, image.as_deref())
                .await?;
            if image.is_some() {
                if let Some(old) = &post.image {
                    let old_path = std::path::Path::new(&config.media.root).join(old);
                    if let Err(e) = tokio::fs::remove_file(&old_path).await {
                        tracing::warn!(error = %e, image = %old, "replaced image not removed");
                    }
                }
            }
            tracing::info!(post_id = post.id, author = %user.username, "post edited");
            Ok(redirect(&format!("/{username}/{post_id}/")))
        }
        Err(form) => {
            let mut ctx = base_context(&MaybeUser(Some(user)));
            ctx.insert("form", &form);
            ctx.insert("post", &post);
            ctx.insert("groups", &groups);
            ctx.insert("is_edit", &true);
            templates::render("post_new.html", &ctx)
        }
    }
}
