//! # Upload Validation
//!
//! Checks an upload before anything touches the filesystem: the post id and
//! file must be present, the file must fit under the size ceiling, and its
//! type must be JPEG, PNG or GIF.
//!
//! The type comes from the part's declared `Content-Type` when there is one.
//! Only a part without a declared type is sniffed. A declared type outside the
//! allow-list is rejected as-is, even if the bytes would have sniffed as an
//! image.

use tracing::{debug, trace, warn};

use crate::error::{AppError, AppResult};
use crate::services::codec::ImageKind;
use crate::utils::constant::MAX_IMAGE_SIZE;

/// File part of an upload, as read from the multipart body.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    /// Bytes received for the part, counted even when `data` was discarded.
    pub size: usize,
    /// File contents. Left empty once `size` passes [`MAX_IMAGE_SIZE`].
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: Option<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            filename,
            content_type,
            size: data.len(),
            data,
        }
    }

    /// A part whose contents were dropped for exceeding the size ceiling.
    pub fn oversized(filename: Option<String>, content_type: Option<String>, size: usize) -> Self {
        Self {
            filename,
            content_type,
            size,
            data: Vec::new(),
        }
    }
}

/// Raw upload form, before validation.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub post_id: Option<String>,
    pub file: Option<UploadedFile>,
}

/// An upload that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub post_id: String,
    pub kind: ImageKind,
    pub original_filename: Option<String>,
    pub data: Vec<u8>,
}

/// Provides image validation utilities for upload handlers.
pub struct ImageUploadValidator;

impl ImageUploadValidator {
    /// Runs every check in order: post id, file presence, size, type.
    pub fn validate(upload: ImageUpload) -> AppResult<ValidatedUpload> {
        let post_id = upload
            .post_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                warn!("Missing post_id field");
                AppError::BadRequest("post_id required")
            })?;

        let file = upload.file.ok_or_else(|| {
            warn!("Missing image field");
            AppError::BadRequest("image field required")
        })?;

        Self::validate_file_not_empty(file.size).map_err(|e| {
            warn!(error = %e, "Empty file uploaded");
            AppError::BadRequest(e)
        })?;

        Self::validate_size(file.size).map_err(|e| {
            warn!(size = file.size, "Image exceeds size limit");
            AppError::BadRequest(e)
        })?;

        let kind = Self::resolve_kind(file.content_type.as_deref(), &file.data).map_err(|e| {
            warn!(content_type = ?file.content_type, "Unsupported image type");
            AppError::BadRequest(e)
        })?;

        debug!(%post_id, ?kind, size = file.data.len(), "Upload validated");
        Ok(ValidatedUpload {
            post_id,
            kind,
            original_filename: file.filename,
            data: file.data,
        })
    }

    /// Validates that the file is not empty.
    pub fn validate_file_not_empty(len: usize) -> Result<(), &'static str> {
        if len == 0 {
            return Err("Empty file not allowed");
        }
        Ok(())
    }

    /// Validates the file size against [`MAX_IMAGE_SIZE`].
    pub fn validate_size(len: usize) -> Result<(), &'static str> {
        if len > MAX_IMAGE_SIZE {
            return Err("Image exceeds 20 MB limit");
        }
        Ok(())
    }

    /// Settles the image kind from the declared content type, falling back to
    /// sniffing the leading bytes when nothing (or an empty value) was
    /// declared.
    pub fn resolve_kind(declared: Option<&str>, data: &[u8]) -> Result<ImageKind, &'static str> {
        let kind = match declared.map(str::trim).filter(|ct| !ct.is_empty()) {
            Some(content_type) => {
                trace!(content_type, "Using declared content type");
                ImageKind::from_mime(content_type)
            }
            None => {
                trace!("No declared content type, sniffing");
                ImageKind::sniff(data)
            }
        };

        kind.ok_or("Unsupported image type")
    }
}
