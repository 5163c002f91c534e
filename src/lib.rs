//! # Forum Images - Post Image Upload Service
//!
//! Accepts images attached to forum posts, stores the original and a 150×150
//! thumbnail under a per-user, per-date directory, and records where they
//! live.
//!
//! ## Modules
//!
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Identity resolution from bearer tokens
//! - [`models`] - Image records and shared application state
//! - [`repository`] - Image metadata persistence
//! - [`services`] - Upload pipeline, codec, thumbnails, storage layout, JWT
//! - [`utils`] - Constants, validation and file helpers

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::handlers::{
    get_post_image, health_check, list_post_images, method_not_allowed, upload_image,
};
use crate::middleware::identity_middleware;
use crate::models::AppState;
use crate::repository::{ImageStore, PgImageStore};
use crate::services::{jwt::JwtService, storage::StorageAllocator, upload::ImageUploader};
use crate::utils::{
    constant::MAX_REQUEST_BODY_SIZE,
    id::{IdGenerator, UuidGenerator},
};

/// Creates the router backed by PostgreSQL and random UUIDs.
#[inline]
pub fn app(db_pool: PgPool, config: &AppConfig) -> Router {
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);
    let image_store = Arc::new(PgImageStore::new(db_pool, Arc::clone(&ids)));
    app_with_services(config, image_store, ids)
}

/// Creates an Axum router with application routes and state.
///
/// # Arguments
///
/// * `config` - Static root and JWT secret
/// * `image_store` - Image metadata store
/// * `ids` - Identifier source for stored filenames
///
/// # Routes
///
/// - `GET /health-check`
/// - `POST /api/images/upload` (any other method answers `405`)
/// - `GET /api/posts/{post_id}/image`
/// - `GET /api/posts/{post_id}/images`
/// - `GET /static/*` - files under the static root, uploads included
pub fn app_with_services(
    config: &AppConfig,
    image_store: Arc<dyn ImageStore>,
    ids: Arc<dyn IdGenerator>,
) -> Router {
    let image_dir = config.image_dir();
    info!(image_dir = %image_dir.display(), "Configuring image storage");

    let allocator = StorageAllocator::new(image_dir, ids);
    let uploader = ImageUploader::new(allocator, Arc::clone(&image_store));
    let jwt_service = JwtService::from_secret(config.jwt_secret.as_bytes());

    let state = Arc::new(AppState::new(uploader, image_store, jwt_service));

    let api_routes = Router::new()
        .route(
            "/api/images/upload",
            post(upload_image).fallback(method_not_allowed),
        )
        .route("/api/posts/{post_id}/image", get(get_post_image))
        .route("/api/posts/{post_id}/images", get(list_post_images))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .layer(from_fn_with_state(Arc::clone(&state), identity_middleware));

    Router::new()
        .route("/health-check", get(health_check))
        .merge(api_routes)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
