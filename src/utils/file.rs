//! # File System Helpers
//!
//! Thin async wrappers over `tokio::fs` used by the storage allocator and the
//! upload pipeline.

use std::path::Path;

use tokio::{
    fs,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, trace};

/// Provides file system utilities for upload handlers.
pub struct FileManager;

impl FileManager {
    /// Ensures the specified directory exists, creating it and any missing
    /// parents if necessary.
    pub async fn ensure_directory_exists(path: &Path) -> Result<(), std::io::Error> {
        trace!(path = %path.display(), "Ensuring directory exists");
        fs::create_dir_all(path).await
    }

    /// Writes `data` to a new file at `file_path`.
    ///
    /// Fails if the file already exists. The data is flushed before returning,
    /// so a subsequent read observes the full contents.
    pub async fn save_file(file_path: &Path, data: &[u8]) -> Result<(), std::io::Error> {
        debug!(file_path = %file_path.display(), size = data.len(), "Saving file");

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(file_path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;

        debug!(file_path = %file_path.display(), "File saved successfully");
        Ok(())
    }

    /// Reads the whole file at `file_path`.
    pub async fn read_file(file_path: &Path) -> Result<Vec<u8>, std::io::Error> {
        trace!(file_path = %file_path.display(), "Reading file");

        let mut file = fs::File::open(file_path).await?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).await?;
        Ok(data)
    }
}
