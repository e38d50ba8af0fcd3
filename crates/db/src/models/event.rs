//! Event entity model and DTOs.

use eventshare_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::scene::Scene;
use crate::models::share_link::ShareLink;

/// An event row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub name: String,
    pub expiry: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub expiry: Timestamp,
}

/// DTO for updating an existing event. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub expiry: Option<Timestamp>,
}

/// An event with its live scenes and share links.
#[derive(Debug, Clone, Serialize)]
pub struct EventWithChildren {
    #[serde(flatten)]
    pub event: Event,
    pub scenes: Vec<Scene>,
    pub share_links: Vec<ShareLink>,
}
