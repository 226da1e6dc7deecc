/// Form intake and validation for posts and comments.
///
/// A submission is read from the request body, validated, and either turned
/// into a draft ready for persistence or sent back to the template with
/// field-level errors. Ownership fields (author, post, publication date) are
/// never part of a form; the calling handler assigns them after validation,
/// so no client-supplied field can influence them.
use actix_multipart::Multipart;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::Group;

/// Upper bound for an uploaded image
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const REQUIRED_MSG: &str = "This field is required.";
const BAD_GROUP_MSG: &str = "Select a valid group.";
const BAD_IMAGE_MSG: &str = "Upload a valid image.";

/// Raw fields read from a multipart post submission. Unknown fields are
/// dropped on the floor, including any client-supplied author.
#[derive(Debug, Default)]
pub struct PostSubmission {
    pub text: String,
    pub group: String,
    pub image: Option<UploadedImage>,
}

#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PostSubmission {
    /// Read the `text`, `group` and `image` fields from a multipart body.
    pub async fn read(mut payload: Multipart) -> Result<Self> {
        let mut submission = PostSubmission::default();

        while let Some(item) = payload.next().await {
            let mut field =
                item.map_err(|e| AppError::BadRequest(format!("multipart error: {e}")))?;
            let name = field.name().unwrap_or("").to_owned();
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename().map(ToOwned::to_owned));

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk =
                    chunk.map_err(|e| AppError::BadRequest(format!("multipart error: {e}")))?;
                if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest("upload too large".to_string()));
                }
                data.extend_from_slice(&chunk);
            }

            match name.as_str() {
                "text" => submission.text = String::from_utf8_lossy(&data).into_owned(),
                "group" => submission.group = String::from_utf8_lossy(&data).into_owned(),
                "image" => {
                    // A file input submitted empty arrives as a zero-length part
                    if !data.is_empty() {
                        submission.image = Some(UploadedImage {
                            file_name: file_name.unwrap_or_default(),
                            bytes: data,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(submission)
    }
}

impl UploadedImage {
    /// Store the image under `<media_root>/posts/` and return the relative
    /// path recorded on the post. The stored name is generated; the client
    /// file name is never used on disk.
    pub async fn save(&self, media_root: &str) -> Result<String> {
        let format = image::guess_format(&self.bytes)
            .map_err(|e| AppError::Internal(format!("image format: {e}")))?;
        let ext = format.extensions_str().first().copied().unwrap_or("img");
        let relative = format!("posts/{}.{}", uuid::Uuid::new_v4(), ext);

        let dir = std::path::Path::new(media_root).join("posts");
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(std::path::Path::new(media_root).join(&relative), &self.bytes).await?;

        Ok(relative)
    }
}

/// Field constraints shared by both forms
#[derive(Debug, Validate)]
struct TextField {
    #[validate(length(min = 1, message = "This field is required."))]
    text: String,
}

fn text_error(value: &str) -> Option<String> {
    let field = TextField {
        text: value.trim().to_string(),
    };
    match field.validate() {
        Ok(()) => None,
        Err(errors) => Some(
            errors
                .field_errors()
                .get("text")
                .and_then(|errs| errs.first())
                .and_then(|e| e.message.clone())
                .map(|m| m.to_string())
                .unwrap_or_else(|| REQUIRED_MSG.to_string()),
        ),
    }
}

/// A validated post draft: everything the handler needs except the ownership
/// fields it assigns itself.
#[derive(Debug)]
pub struct ValidPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<UploadedImage>,
}

#[derive(Debug, Default, Serialize)]
pub struct PostFormErrors {
    pub text: Option<String>,
    pub group: Option<String>,
    pub image: Option<String>,
}

/// The post form as seen by the template: current values plus field errors.
#[derive(Debug, Default, Serialize)]
pub struct PostFormState {
    pub text: String,
    pub group: String,
    pub errors: PostFormErrors,
}

impl PostFormState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pre-fill from an existing post for the edit page.
    pub fn prefill(text: &str, group_id: Option<i64>) -> Self {
        PostFormState {
            text: text.to_string(),
            group: group_id.map(|id| id.to_string()).unwrap_or_default(),
            errors: PostFormErrors::default(),
        }
    }
}

/// Validate a post submission against the known groups.
///
/// On failure the returned state carries the submitted values and the
/// field-level messages for redisplay.
pub fn validate_post(
    submission: PostSubmission,
    groups: &[Group],
) -> std::result::Result<ValidPost, PostFormState> {
    let text = submission.text.trim().to_string();
    let mut errors = PostFormErrors {
        text: text_error(&submission.text),
        ..PostFormErrors::default()
    };

    let group_raw = submission.group.trim();
    let group_id = if group_raw.is_empty() {
        None
    } else {
        match group_raw.parse::<i64>() {
            Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
            _ => {
                errors.group = Some(BAD_GROUP_MSG.to_string());
                None
            }
        }
    };

    if let Some(upload) = &submission.image {
        if image::guess_format(&upload.bytes).is_err() {
            errors.image = Some(BAD_IMAGE_MSG.to_string());
        }
    }

    if errors.text.is_some() || errors.group.is_some() || errors.image.is_some() {
        return Err(PostFormState {
            text: submission.text,
            group: submission.group,
            errors,
        });
    }

    Ok(ValidPost {
        text,
        group_id,
        image: submission.image,
    })
}

/// Urlencoded body of the comment form
#[derive(Debug, Deserialize)]
pub struct CommentFormData {
    pub text: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CommentFormErrors {
    pub text: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct CommentFormState {
    pub text: String,
    pub errors: CommentFormErrors,
}

impl CommentFormState {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Validate a comment submission; returns the trimmed text or a redisplay
/// state.
pub fn validate_comment(data: CommentFormData) -> std::result::Result<String, CommentFormState> {
    match text_error(&data.text) {
        None => Ok(data.text.trim().to_string()),
        Some(message) => Err(CommentFormState {
            text: data.text,
            errors: CommentFormErrors {
                text: Some(message),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: i64, slug: &str) -> Group {
        Group {
            id,
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_text_is_rejected() {
        let submission = PostSubmission {
            text: "   ".to_string(),
            ..PostSubmission::default()
        };
        let state = validate_post(submission, &[]).unwrap_err();
        assert_eq!(state.errors.text.as_deref(), Some(REQUIRED_MSG));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let submission = PostSubmission {
            text: "hello".to_string(),
            group: "42".to_string(),
            image: None,
        };
        let state = validate_post(submission, &[group(1, "cats")]).unwrap_err();
        assert_eq!(state.errors.group.as_deref(), Some(BAD_GROUP_MSG));
        assert!(state.errors.text.is_none());
    }

    #[test]
    fn empty_group_means_no_group() {
        let submission = PostSubmission {
            text: "hello".to_string(),
            group: "".to_string(),
            image: None,
        };
        let valid = validate_post(submission, &[group(1, "cats")]).unwrap();
        assert_eq!(valid.group_id, None);
        assert_eq!(valid.text, "hello");
    }

    #[test]
    fn valid_group_is_accepted() {
        let submission = PostSubmission {
            text: "Тестовый текст".to_string(),
            group: "1".to_string(),
            image: None,
        };
        let valid = validate_post(submission, &[group(1, "cats")]).unwrap();
        assert_eq!(valid.group_id, Some(1));
    }

    #[test]
    fn non_image_upload_is_rejected() {
        let submission = PostSubmission {
            text: "hello".to_string(),
            group: String::new(),
            image: Some(UploadedImage {
                file_name: "notes.txt".to_string(),
                bytes: b"plain text, not pixels".to_vec(),
            }),
        };
        let state = validate_post(submission, &[]).unwrap_err();
        assert_eq!(state.errors.image.as_deref(), Some(BAD_IMAGE_MSG));
    }

    #[test]
    fn comment_text_is_trimmed() {
        let text = validate_comment(CommentFormData {
            text: "  nice post  ".to_string(),
        })
        .unwrap();
        assert_eq!(text, "nice post");
    }

    #[test]
    fn empty_comment_is_rejected() {
        let state = validate_comment(CommentFormData {
            text: "\n".to_string(),
        })
        .unwrap_err();
        assert!(state.errors.text.is_some());
    }
}
