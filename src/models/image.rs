use serde::Serialize;
use time::OffsetDateTime;

/// Metadata for an uploaded image attached to a post.
///
/// Records are created once per successful upload and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Image {
    #[sqlx(rename = "image_id")]
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    /// Public URL of the stored original.
    pub path: String,
    /// Public URL of the stored thumbnail.
    pub thumbnail_path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields supplied by the upload pipeline. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub post_id: String,
    pub user_id: String,
    pub path: String,
    pub thumbnail_path: String,
}

impl NewImage {
    pub fn into_image(self, id: String, created_at: OffsetDateTime) -> Image {
        Image {
            id,
            post_id: self.post_id,
            user_id: self.user_id,
            path: self.path,
            thumbnail_path: self.thumbnail_path,
            created_at,
        }
    }
}
