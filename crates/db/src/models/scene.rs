//! Scene entity model and DTOs.

use eventshare_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::media::Media;

/// A row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new scene.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScene {
    pub event_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// DTO for updating an existing scene.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScene {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

/// A scene with its live media, ordered by `image_order`.
#[derive(Debug, Clone, Serialize)]
pub struct SceneWithMedia {
    #[serde(flatten)]
    pub scene: Scene,
    pub media: Vec<Media>,
}
