//! # Post Image Lookup Handlers
//!
//! Read-only access to the image metadata recorded for a post.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, instrument};

use crate::{
    error::{AppError, AppResult},
    models::{AppState, Image},
};

/// Returns the most recent image of a post.
///
/// GET /api/posts/{post_id}/image
///
/// # Returns
///
/// - `200 OK` with the image record
/// - `404 Not Found` - The post has no images
/// - `500 Internal Server Error` - Database error
#[instrument(skip(state))]
pub async fn get_post_image(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> AppResult<Json<Image>> {
    let image = state
        .image_store
        .get_by_post_id(&post_id)
        .await?
        .ok_or_else(|| {
            debug!("No image recorded for post");
            AppError::NotFound("No image found for post")
        })?;

    Ok(Json(image))
}

/// Returns every image of a post, newest first.
///
/// GET /api/posts/{post_id}/images
#[instrument(skip(state))]
pub async fn list_post_images(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> AppResult<Json<Vec<Image>>> {
    let images = state.image_store.list_by_post_id(&post_id).await?;
    debug!(count = images.len(), "Listed post images");
    Ok(Json(images))
}
