//! Share link entity model and DTOs.

use eventshare_core::share_link;
use eventshare_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `share_links` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ShareLink {
    pub id: DbId,
    pub key: String,
    pub event_id: DbId,
    pub expiry: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShareLink {
    /// Whether this link grants access at `now`. Does not look at the
    /// owning event.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        share_link::is_valid(self.expiry, self.deleted_at, now)
    }
}

/// DTO for creating a share link.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShareLink {
    pub event_id: DbId,
    /// Generated when omitted.
    pub key: Option<String>,
    /// Defaults to seven days from now when omitted.
    pub expiry: Option<Timestamp>,
}
