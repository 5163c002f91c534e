//! # Runtime Configuration
//!
//! Settings are read once from the environment at startup and handed to the
//! router builder. Nothing downstream reads the environment on its own; the
//! storage root in particular reaches the allocator as a constructor argument.

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info};

use crate::utils::constant::IMAGE_UPLOAD_SUBDIR;

const DEFAULT_STATIC_DIR: &str = "ui/static";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8090";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("env variable `{0}` should be set")]
    Missing(&'static str),
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root served under `/static/`. Uploaded images live in
    /// `<static_dir>/uploads/images`.
    pub static_dir: PathBuf,
    /// Socket address the server binds to.
    pub bind_address: String,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: String,
}

impl AppConfig {
    /// Builds a configuration with the given static root and secret and the
    /// default bind address.
    pub fn new(static_dir: impl Into<PathBuf>, jwt_secret: impl Into<String>) -> Self {
        Self {
            static_dir: static_dir.into(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Loads the configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `STATIC_DIR` - static asset root (fallback `ui/static`)
    /// - `BIND_ADDRESS` - listen address (fallback `0.0.0.0:8090`)
    /// - `JWT_SECRET` - required
    pub fn from_env() -> Result<Self, ConfigError> {
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| {
            error!("Missing STATIC_DIR env var, using fallback '{DEFAULT_STATIC_DIR}'");
            DEFAULT_STATIC_DIR.to_string()
        });

        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| {
            info!("BIND_ADDRESS not set, using '{DEFAULT_BIND_ADDRESS}'");
            DEFAULT_BIND_ADDRESS.to_string()
        });

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            static_dir: PathBuf::from(static_dir),
            bind_address,
            jwt_secret,
        })
    }

    /// Base directory for image originals and thumbnails.
    pub fn image_dir(&self) -> PathBuf {
        self.static_dir.join(IMAGE_UPLOAD_SUBDIR)
    }
}
