//! # Image Upload Pipeline
//!
//! Runs one upload end to end, strictly in order:
//!
//! 1. validate the form
//! 2. allocate the storage target and create its directories
//! 3. write the original
//! 4. read the written file back and decode it
//! 5. render the thumbnail
//! 6. encode and write the thumbnail
//! 7. insert the metadata record
//!
//! Nothing is rolled back. A failure after step 2 can leave the directory,
//! the original or the thumbnail on disk without a record pointing at them.
//! The record insert is the last step, so a record only ever exists for a
//! complete upload.

use std::sync::Arc;

use serde::Serialize;
use tracing::{Span, debug, error, info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::NewImage;
use crate::repository::ImageStore;
use crate::services::{
    codec::{self, ImageKind},
    storage::StorageAllocator,
    thumbnail::create_thumbnail,
};
use crate::utils::{
    constant::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH},
    file::FileManager,
    upload::{ImageUpload, ImageUploadValidator},
};

/// Public locations of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub path: String,
    pub thumbnail_path: String,
}

/// Coordinates validation, storage, thumbnailing and metadata for uploads.
pub struct ImageUploader {
    allocator: StorageAllocator,
    store: Arc<dyn ImageStore>,
}

impl ImageUploader {
    pub fn new(allocator: StorageAllocator, store: Arc<dyn ImageStore>) -> Self {
        Self { allocator, store }
    }

    pub fn allocator(&self) -> &StorageAllocator {
        &self.allocator
    }

    /// Stores `upload` on behalf of `user`.
    ///
    /// # Errors
    ///
    /// - [`AppError::BadRequest`] - validation failed; nothing was written
    /// - [`AppError::Decode`] - the stored original does not parse as its
    ///   declared format; the original stays on disk
    /// - [`AppError::Storage`] - directory, file or encoder failure
    /// - [`AppError::Db`] - the record insert failed; both files stay on disk
    #[instrument(skip_all, fields(user_id = %user.user_id, post_id))]
    pub async fn upload(&self, user: &AuthUser, upload: ImageUpload) -> AppResult<UploadedImage> {
        let upload = ImageUploadValidator::validate(upload)?;
        Span::current().record("post_id", upload.post_id.as_str());

        let target = self
            .allocator
            .allocate(
                &user.user_id,
                upload.original_filename.as_deref(),
                upload.kind,
            )
            .await?;

        let original_path = target.original_path();
        FileManager::save_file(&original_path, &upload.data)
            .await
            .map_err(|e| {
                error!(error = %e, path = %original_path.display(), "Failed to save image");
                AppError::Storage("Failed to save image")
            })?;
        let original_size = upload.data.len();
        drop(upload.data);

        let written = FileManager::read_file(&original_path).await.map_err(|e| {
            error!(error = %e, path = %original_path.display(), "Failed to reopen saved image");
            AppError::Storage("Failed to process image")
        })?;

        let kind = upload.kind;
        let span = Span::current();
        let thumbnail = tokio::task::spawn_blocking(move || {
            span.in_scope(|| render_thumbnail(kind, &written))
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Thumbnail task failed");
            AppError::Internal
        })??;

        let thumbnail_path = target.thumbnail_path();
        FileManager::save_file(&thumbnail_path, &thumbnail)
            .await
            .map_err(|e| {
                error!(error = %e, path = %thumbnail_path.display(), "Failed to save thumbnail");
                AppError::Storage("Failed to save thumbnail")
            })?;

        let record = self
            .store
            .create(NewImage {
                post_id: upload.post_id,
                user_id: user.user_id.clone(),
                path: target.public_path(),
                thumbnail_path: target.public_thumbnail_path(),
            })
            .await?;

        info!(
            image_id = %record.id,
            original_size,
            thumbnail_size = thumbnail.len(),
            "Image uploaded"
        );

        Ok(UploadedImage {
            path: record.path,
            thumbnail_path: record.thumbnail_path,
        })
    }
}

/// Decodes the stored original and encodes its thumbnail in the same format.
fn render_thumbnail(kind: ImageKind, data: &[u8]) -> AppResult<Vec<u8>> {
    let image = codec::decode(kind, data).map_err(|e| {
        warn!(error = %e, ?kind, "Stored bytes do not decode as declared format");
        AppError::Decode("Failed to decode image")
    })?;

    debug!(
        width = image.width(),
        height = image.height(),
        "Original decoded"
    );
    let thumbnail = create_thumbnail(&image, THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT);

    codec::encode(kind, thumbnail).map_err(|e| {
        error!(error = %e, ?kind, "Failed to encode thumbnail");
        AppError::Storage("Failed to save thumbnail")
    })
}
