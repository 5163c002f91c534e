//! # Persistence
//!
//! Database access for image metadata.

mod image_store;

pub use image_store::{ImageStore, PgImageStore};
