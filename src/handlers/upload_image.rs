//! # Image Upload Handler
//!
//! Accepts `multipart/form-data` with a `post_id` text field and an `image`
//! file field, and hands the parsed form to the upload pipeline together with
//! the caller's resolved identity.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartRejection},
    },
};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    error::{AppError, AppResult},
    middleware::MaybeAuthUser,
    models::AppState,
    services::upload::UploadedImage,
    utils::{
        constant::{IMAGE_FIELD, MAX_IMAGE_SIZE, POST_ID_FIELD},
        upload::{ImageUpload, UploadedFile},
    },
};

/// Uploads an image for a post.
///
/// POST /api/images/upload MultipartForm
///
/// # Fields
///
/// - `post_id` - owning post, required
/// - `image` - the file, required, at most 20 MiB, JPEG/PNG/GIF as declared
///   by its `Content-Type` or, when none is declared, as sniffed
///
/// # Returns
///
/// - `200 OK` with `{"path", "thumbnail_path"}` - public URLs of the stored files
/// - `400 Bad Request` - Invalid form, missing field, oversize, unsupported
///   type, or bytes that fail to decode
/// - `401 Unauthorized` - No authenticated user; checked before the body is read
/// - `500 Internal Server Error` - File system or database error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadedImage>> {
    let Some(user) = user else {
        warn!("Upload attempted without an authenticated user");
        return Err(AppError::Unauthorized("Unauthorized"));
    };

    debug!(user_id = %user.user_id, "Processing image upload request");

    let multipart = multipart.map_err(|e| {
        warn!(error = %e, "Request is not a valid multipart form");
        AppError::BadRequest("Invalid form data")
    })?;

    let upload = read_image_upload(multipart).await?;
    let uploaded = state.uploader.upload(&user, upload).await?;

    info!(path = %uploaded.path, "Upload request completed");
    Ok(Json(uploaded))
}

/// Collects the known fields of the form. Only the first `post_id` and the
/// first `image` are used.
///
/// The whole body is consumed even when the image turns out to be oversized,
/// so the client always receives the error response. Field checks, the size
/// ceiling included, are left to the validator.
async fn read_image_upload(mut multipart: Multipart) -> AppResult<ImageUpload> {
    let mut upload = ImageUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Error reading multipart form");
        AppError::BadRequest("Invalid form data")
    })? {
        let field_name = field.name().unwrap_or("").to_owned();

        match field_name.as_str() {
            POST_ID_FIELD if upload.post_id.is_none() => {
                let post_id = field.text().await.map_err(|e| {
                    warn!(error = %e, "Error reading post_id field");
                    AppError::BadRequest("Invalid form data")
                })?;
                upload.post_id = Some(post_id);
            }
            IMAGE_FIELD if upload.file.is_none() => {
                upload.file = Some(read_file_field(field).await?);
            }
            POST_ID_FIELD | IMAGE_FIELD => {
                debug!(field_name = %field_name, "Ignoring repeated field");
            }
            _ => {
                warn!(field_name = %field_name, "Unknown field in multipart form");
            }
        }
    }

    Ok(upload)
}

/// Reads a file part. Past the size ceiling the contents are discarded and
/// only the byte count is kept.
async fn read_file_field(mut field: Field<'_>) -> AppResult<UploadedFile> {
    let filename = field.file_name().map(str::to_owned);
    let content_type = field.content_type().map(str::to_owned);
    let mut data = Vec::new();
    let mut total = 0usize;

    while let Some(chunk) = field.chunk().await.map_err(|e| {
        warn!(error = %e, "Error reading file data");
        AppError::BadRequest("Invalid form data")
    })? {
        total += chunk.len();
        if total > MAX_IMAGE_SIZE {
            data = Vec::new();
            continue;
        }
        data.extend_from_slice(&chunk);
    }

    trace!(?filename, ?content_type, size = total, "File field read");
    if total > MAX_IMAGE_SIZE {
        return Ok(UploadedFile::oversized(filename, content_type, total));
    }
    Ok(UploadedFile::new(filename, content_type, data))
}
