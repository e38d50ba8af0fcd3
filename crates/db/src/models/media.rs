//! Media entity model and DTOs.

use eventshare_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub scene_id: DbId,
    pub web_resolution_url: String,
    pub high_resolution_url: String,
    pub image_order: i32,
    pub selected: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new media item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMedia {
    pub scene_id: DbId,
    #[validate(length(min = 1, max = 2048))]
    pub web_resolution_url: String,
    #[validate(length(min = 1, max = 2048))]
    pub high_resolution_url: String,
    /// Defaults to 0 if omitted.
    #[validate(range(min = 0))]
    pub image_order: Option<i32>,
    /// Defaults to `false` if omitted.
    pub selected: Option<bool>,
}

/// DTO for updating an existing media item. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMedia {
    #[validate(length(min = 1, max = 2048))]
    pub web_resolution_url: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub high_resolution_url: Option<String>,
    #[validate(range(min = 0))]
    pub image_order: Option<i32>,
    pub selected: Option<bool>,
}

// ---------------------------------------------------------------------------
// Filter DTO (query parameters)
// ---------------------------------------------------------------------------

/// Filter for [`MediaRepo::list`](crate::repositories::MediaRepo::list).
/// `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaFilter {
    pub scene_id: Option<DbId>,
    pub selected: Option<bool>,
    pub web_resolution_url: Option<String>,
}
