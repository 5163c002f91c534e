//! # Application Constants
//!
//! Limits and fixed layout values for the image upload pipeline.

use std::time::Duration;

/// Hard ceiling for a single uploaded image file (20 MiB).
pub const MAX_IMAGE_SIZE: usize = 20 * 1024 * 1024;

/// Ceiling for the whole request body.
///
/// Leaves 1 MiB of headroom above [`MAX_IMAGE_SIZE`] for the multipart framing
/// and the text fields, so an oversized file is reported by the upload
/// validator rather than by the transport.
pub const MAX_REQUEST_BODY_SIZE: usize = 21 * 1024 * 1024;

/// Number of leading bytes inspected when sniffing the content type.
pub const SNIFF_LEN: usize = 512;

/// Thumbnail canvas width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 150;

/// Thumbnail canvas height in pixels.
pub const THUMBNAIL_HEIGHT: u32 = 150;

/// JPEG quality used when encoding thumbnails.
pub const JPEG_QUALITY: u8 = 80;

/// Directory under the static root that holds uploaded images.
pub const IMAGE_UPLOAD_SUBDIR: &str = "uploads/images";

/// Name of the per-date subdirectory holding thumbnails.
pub const THUMBNAIL_SUBDIR: &str = "thumbnails";

/// URL prefix under which the static root is served.
pub const STATIC_URL_PREFIX: &str = "/static/";

/// Multipart field carrying the owning post identifier.
pub const POST_ID_FIELD: &str = "post_id";

/// Multipart field carrying the image file.
pub const IMAGE_FIELD: &str = "image";

/// Expiration time for bearer access tokens.
pub const ACCESS_TOKEN_EXPIRY: Duration = Duration::from_secs(15 * 60);
