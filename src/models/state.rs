use std::sync::Arc;

use tracing::{debug, info};

use crate::repository::ImageStore;
use crate::services::jwt::JwtService;
use crate::services::upload::ImageUploader;

/// Application state shared across requests. Needs to be thread-safe.
pub struct AppState {
    /// Runs the upload pipeline.
    pub uploader: ImageUploader,
    /// Image metadata store, shared with the uploader.
    pub image_store: Arc<dyn ImageStore>,
    /// Bearer token validation.
    pub jwt_service: JwtService,
}

impl AppState {
    /// Creates a new application state with the provided services.
    ///
    /// # Arguments
    ///
    /// * `uploader` - Upload pipeline, already wired to its allocator and store
    /// * `image_store` - Metadata store used by the lookup handlers
    /// * `jwt_service` - Service for bearer token validation
    pub fn new(
        uploader: ImageUploader,
        image_store: Arc<dyn ImageStore>,
        jwt_service: JwtService,
    ) -> Self {
        info!("Initializing application state");
        debug!(
            image_dir = %uploader.allocator().base_dir().display(),
            "Upload pipeline configured"
        );

        Self {
            uploader,
            image_store,
            jwt_service,
        }
    }
}
