//! # HTTP Request Handlers
//!
//! ## Available Handlers
//!
//! - **Upload** (`upload_image`) - Image upload for forum posts
//! - **Post Images** (`post_images`) - Image metadata lookup by post
//! - **Health Check** (`health_check`) - Application health monitoring
//! - **Fallback** (`fallback`) - JSON `405` for unsupported methods

mod fallback;
mod health_check;
mod post_images;
mod upload_image;

pub use fallback::*;
pub use health_check::*;
pub use post_images::*;
pub use upload_image::*;
