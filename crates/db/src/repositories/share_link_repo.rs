//! Repository for the `share_links` table.
//!
//! Share links are addressed by their key rather than their numeric id.

use chrono::Utc;
use eventshare_core::error::CoreError;
use eventshare_core::hierarchy::EntityKind;
use eventshare_core::share_link;
use eventshare_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::share_link::{CreateShareLink, ShareLink};
use crate::repositories::closure::{self, live_condition, live_parent_exists, RowRef};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, key, event_id, expiry, deleted_at, created_at, updated_at";

const KIND: EntityKind = EntityKind::ShareLink;

/// Provides CRUD, validity, soft-delete and restore operations for share links.
pub struct ShareLinkRepo;

impl ShareLinkRepo {
    /// Insert a new share link for a live event.
    ///
    /// A key is generated when none is supplied; the expiry defaults to
    /// [`share_link::DEFAULT_TTL_DAYS`] from now. Fails with a conflict if the
    /// key is already taken by any link, live or soft-deleted.
    pub async fn create(pool: &PgPool, input: &CreateShareLink) -> DbResult<ShareLink> {
        let key = match &input.key {
            Some(key) => key.clone(),
            None => share_link::generate_key(),
        };
        share_link::validate_key(&key)?;
        let expiry = input
            .expiry
            .unwrap_or_else(|| share_link::default_expiry(Utc::now()));

        let query = format!(
            "INSERT INTO share_links (key, event_id, expiry)
             SELECT $1::text, $2::bigint, $3::timestamptz
             WHERE {}
             RETURNING {COLUMNS}",
            live_parent_exists(EntityKind::Event, "$2")
        );
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(&key)
            .bind(input.event_id)
            .bind(expiry)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityKind::Event.label(), input.event_id))?;
        tracing::debug!(id = link.id, event_id = link.event_id, expiry = %link.expiry, "Share link created");
        Ok(link)
    }

    /// Find a share link by key. Excludes soft-deleted links and links of
    /// soft-deleted events; expired links are returned.
    pub async fn find_by_key(pool: &PgPool, key: &str) -> DbResult<Option<ShareLink>> {
        let query = format!(
            "SELECT {COLUMNS} FROM share_links WHERE key = $1 AND {}",
            live_condition(KIND)
        );
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await?;
        Ok(link)
    }

    /// Find a share link by key, including soft-deleted rows.
    pub async fn find_by_key_include_deleted(
        pool: &PgPool,
        key: &str,
    ) -> DbResult<Option<ShareLink>> {
        let query = format!("SELECT {COLUMNS} FROM share_links WHERE key = $1");
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await?;
        Ok(link)
    }

    /// Find a share link that currently grants access: live and unexpired.
    pub async fn find_valid_by_key(pool: &PgPool, key: &str) -> DbResult<Option<ShareLink>> {
        let query = format!(
            "SELECT {COLUMNS} FROM share_links WHERE key = $1 AND expiry > NOW() AND {}",
            live_condition(KIND)
        );
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await?;
        Ok(link)
    }

    /// List live share links of an event, expired or not, oldest first.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> DbResult<Vec<ShareLink>> {
        let query = format!(
            "SELECT {COLUMNS} FROM share_links
             WHERE event_id = $1 AND {}
             ORDER BY created_at ASC, id ASC",
            live_condition(KIND)
        );
        let links = sqlx::query_as::<_, ShareLink>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await?;
        Ok(links)
    }

    /// List valid share links (live and unexpired), optionally restricted to
    /// one event, soonest expiry first.
    pub async fn list_active(pool: &PgPool, event_id: Option<DbId>) -> DbResult<Vec<ShareLink>> {
        let query = format!(
            "SELECT {COLUMNS} FROM share_links
             WHERE expiry > NOW()
               AND ($1::bigint IS NULL OR event_id = $1)
               AND {}
             ORDER BY expiry ASC, id ASC",
            live_condition(KIND)
        );
        let links = sqlx::query_as::<_, ShareLink>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await?;
        Ok(links)
    }

    /// Move the expiry of a live share link.
    ///
    /// Returns `None` if no live link with the given key exists.
    pub async fn extend(
        pool: &PgPool,
        key: &str,
        expiry: Timestamp,
    ) -> DbResult<Option<ShareLink>> {
        let query = format!(
            "UPDATE share_links SET expiry = $2
             WHERE key = $1 AND {}
             RETURNING {COLUMNS}",
            live_condition(KIND)
        );
        let link = sqlx::query_as::<_, ShareLink>(&query)
            .bind(key)
            .bind(expiry)
            .fetch_optional(pool)
            .await?;
        Ok(link)
    }

    /// Soft-delete a share link. Returns `false` if it was already soft-deleted.
    pub async fn soft_delete(pool: &PgPool, key: &str) -> DbResult<bool> {
        closure::soft_delete(pool, KIND, RowRef::Key(key)).await
    }

    /// Restore a soft-deleted share link.
    ///
    /// Fails with a conflict while its event is soft-deleted.
    pub async fn restore(pool: &PgPool, key: &str) -> DbResult<bool> {
        closure::restore(pool, KIND, RowRef::Key(key)).await
    }

    /// Permanently delete a share link.
    pub async fn hard_delete(pool: &PgPool, key: &str) -> DbResult<()> {
        closure::hard_delete(pool, KIND, RowRef::Key(key)).await
    }

    /// Permanently delete links, live or soft-deleted, whose expiry lies
    /// before `cutoff`. Returns the number of rows removed.
    pub async fn delete_expired_before(pool: &PgPool, cutoff: Timestamp) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM share_links WHERE expiry < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every share link.
    pub async fn delete_all(pool: &PgPool) -> DbResult<u64> {
        closure::delete_all(pool, KIND).await
    }
}
