//! # Storage Path Allocation
//!
//! Every upload gets a fresh identifier and a home of the form
//!
//! ```text
//! <base>/<user_id>/<YYYY-MM-DD>/<id><ext>
//! <base>/<user_id>/<YYYY-MM-DD>/thumbnails/<id><ext>
//! ```
//!
//! The original and its thumbnail share the same filename; only the
//! directory differs. Public URLs mirror the same layout under
//! `/static/uploads/images`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tracing::{debug, error, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::services::codec::ImageKind;
use crate::utils::{
    constant::{IMAGE_UPLOAD_SUBDIR, STATIC_URL_PREFIX, THUMBNAIL_SUBDIR},
    file::FileManager,
    id::IdGenerator,
    validator::{is_safe_path_segment, original_extension},
};

/// The server's local date, falling back to UTC when the local offset cannot
/// be determined.
pub fn upload_date() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Formats a date as the `YYYY-MM-DD` directory name.
pub fn date_segment(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Picks the stored file's extension: the original filename's when it has a
/// usable one, otherwise the one implied by the validated type.
pub fn file_extension(original_filename: Option<&str>, kind: ImageKind) -> String {
    original_filename
        .and_then(original_extension)
        .unwrap_or_else(|| kind.extension().to_string())
}

/// Where one upload lives, on disk and publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    /// `<user_id>/<YYYY-MM-DD>`, relative to the image base.
    pub relative_dir: String,
    pub directory: PathBuf,
    pub thumbnail_directory: PathBuf,
    /// `<id><ext>`, shared by the original and its thumbnail.
    pub filename: String,
}

impl StorageTarget {
    pub fn original_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    pub fn thumbnail_path(&self) -> PathBuf {
        self.thumbnail_directory.join(&self.filename)
    }

    /// Public URL of the original.
    pub fn public_path(&self) -> String {
        format!(
            "{STATIC_URL_PREFIX}{IMAGE_UPLOAD_SUBDIR}/{}/{}",
            self.relative_dir, self.filename
        )
    }

    /// Public URL of the thumbnail.
    pub fn public_thumbnail_path(&self) -> String {
        format!(
            "{STATIC_URL_PREFIX}{IMAGE_UPLOAD_SUBDIR}/{}/{THUMBNAIL_SUBDIR}/{}",
            self.relative_dir, self.filename
        )
    }
}

/// Derives storage locations and creates their directories.
pub struct StorageAllocator {
    base_dir: PathBuf,
    ids: Arc<dyn IdGenerator>,
}

impl StorageAllocator {
    pub fn new(base_dir: impl Into<PathBuf>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ids,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Allocates a target for today's date. See [`Self::allocate_on`].
    pub async fn allocate(
        &self,
        user_id: &str,
        original_filename: Option<&str>,
        kind: ImageKind,
    ) -> AppResult<StorageTarget> {
        self.allocate_on(user_id, upload_date(), original_filename, kind)
            .await
    }

    /// Allocates a fresh target under `<base>/<user_id>/<date>/` and creates
    /// the directory together with its `thumbnails/` child.
    ///
    /// A `user_id` that is not a single safe path segment is refused with
    /// [`AppError::BadRequest`] before anything is created. Identities coming
    /// through `identity_middleware` are already filtered the same way, so
    /// over HTTP this only guards direct callers.
    #[instrument(skip(self, original_filename, kind))]
    pub async fn allocate_on(
        &self,
        user_id: &str,
        date: Date,
        original_filename: Option<&str>,
        kind: ImageKind,
    ) -> AppResult<StorageTarget> {
        if !is_safe_path_segment(user_id) {
            warn!("User id is not usable as a directory name");
            return Err(AppError::BadRequest("Invalid user identity"));
        }

        let relative_dir = format!("{user_id}/{}", date_segment(date));
        let directory = self.base_dir.join(user_id).join(date_segment(date));
        let thumbnail_directory = directory.join(THUMBNAIL_SUBDIR);

        FileManager::ensure_directory_exists(&thumbnail_directory)
            .await
            .map_err(|e| {
                error!(error = %e, path = %thumbnail_directory.display(), "Failed to create directory");
                AppError::Storage("Failed to create directory")
            })?;

        let filename = format!(
            "{}{}",
            self.ids.generate(),
            file_extension(original_filename, kind)
        );

        debug!(%relative_dir, %filename, "Storage target allocated");
        Ok(StorageTarget {
            relative_dir,
            directory,
            thumbnail_directory,
            filename,
        })
    }
}
