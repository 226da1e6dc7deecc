/// Comment handlers
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, MaybeUser};
use crate::db::{comment_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::forms::{self, CommentFormData};
use crate::handlers::{base_context, parse_post_id, redirect};
use crate::templates;

/// POST /{username}/{post_id}/comment/
///
/// The comment's author is the session actor and its post is the target of
/// the URL; nothing in the submitted body can choose either.
pub async fn add_comment(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
    form: web::Form<CommentFormData>,
) -> Result<HttpResponse> {
    let (username, raw_id) = path.into_inner();
    let post_id = parse_post_id(&raw_id)?;

    let post = post_repo::find_post_detail(&pool, post_id, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))?;

    match forms::validate_comment(form.into_inner()) {
        Ok(text) => {
            let comment = comment_repo::create_comment(&pool, post.id, user.id, &text).await?;
            tracing::info!(
                comment_id = comment.id,
                post_id = post.id,
                author = %user.username,
                "comment added"
            );
            Ok(redirect(&format!("/{username}/{post_id}/")))
        }
        Err(form_state) => {
            // Redisplay the post page with the rejected comment form
            let author = user_repo::find_by_username(&pool, &username)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;
            let comments = comment_repo::list_comments_by_post(&pool, post.id).await?;

            let mut ctx = base_context(&MaybeUser(Some(user)));
            ctx.insert("post", &post);
            ctx.insert("author_posts", &author);
            ctx.insert("comments", &comments);
            ctx.insert("form", &form_state);
            templates::render("post.html", &ctx)
        }
    }
}
