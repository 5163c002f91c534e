//! # Image Metadata Store
//!
//! Durable mapping from posts to the images uploaded for them.
//!
//! A post may accumulate several images over time. Lookups order them by
//! `created_at` (newest first) with the record id as tie-breaker, so "the"
//! image of a post is always the most recent upload.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{debug, error, instrument, trace};

use crate::models::{Image, NewImage};
use crate::utils::id::IdGenerator;

/// Storage interface for image metadata.
///
/// Implementations must be safe for concurrent use; the store is shared by
/// every in-flight upload.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Assigns an id and creation timestamp, inserts the record and returns
    /// it fully populated.
    async fn create(&self, image: NewImage) -> Result<Image, sqlx::Error>;

    /// Returns the most recent image of the post, or `None` when the post has
    /// no images.
    async fn get_by_post_id(&self, post_id: &str) -> Result<Option<Image>, sqlx::Error>;

    /// Returns every image of the post, newest first.
    async fn list_by_post_id(&self, post_id: &str) -> Result<Vec<Image>, sqlx::Error>;
}

/// PostgreSQL-backed [`ImageStore`].
pub struct PgImageStore {
    db_pool: PgPool,
    ids: Arc<dyn IdGenerator>,
}

impl PgImageStore {
    /// Record ids are drawn from `ids`.
    pub fn new(db_pool: PgPool, ids: Arc<dyn IdGenerator>) -> Self {
        Self { db_pool, ids }
    }
}

#[async_trait]
impl ImageStore for PgImageStore {
    #[instrument(skip_all, fields(post_id = %image.post_id, user_id = %image.user_id))]
    async fn create(&self, image: NewImage) -> Result<Image, sqlx::Error> {
        let id = self.ids.generate();
        // Postgres keeps microseconds; truncate so the returned record matches
        // what a later read yields.
        let now = OffsetDateTime::now_utc();
        let created_at = now
            .replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
            .unwrap_or(now);

        trace!(image_id = %id, "Inserting image record");

        sqlx::query(
            r#"
            INSERT INTO images (image_id, post_id, user_id, path, thumbnail_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(&image.post_id)
        .bind(&image.user_id)
        .bind(&image.path)
        .bind(&image.thumbnail_path)
        .bind(created_at)
        .execute(&self.db_pool)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to insert image record"))?;

        debug!(image_id = %id, "Image record created");
        Ok(image.into_image(id, created_at))
    }

    #[instrument(skip(self))]
    async fn get_by_post_id(&self, post_id: &str) -> Result<Option<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT image_id, post_id, user_id, path, thumbnail_path, created_at
            FROM images
            WHERE post_id = $1
            ORDER BY created_at DESC, image_id DESC
            LIMIT 1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.db_pool)
        .await
    }

    #[instrument(skip(self))]
    async fn list_by_post_id(&self, post_id: &str) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT image_id, post_id, user_id, path, thumbnail_path, created_at
            FROM images
            WHERE post_id = $1
            ORDER BY created_at DESC, image_id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.db_pool)
        .await
    }
}
