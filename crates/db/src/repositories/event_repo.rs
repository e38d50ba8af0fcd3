//! Repository for the `events` table.

use eventshare_core::error::CoreError;
use eventshare_core::hierarchy::EntityKind;
use eventshare_core::types::DbId;
use sqlx::PgPool;
use validator::Validate;

use crate::error::DbResult;
use crate::models::event::{CreateEvent, Event, EventWithChildren, UpdateEvent};
use crate::repositories::closure::{self, RowRef};
use crate::repositories::{SceneRepo, ShareLinkRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, expiry, deleted_at, created_at, updated_at";

const KIND: EntityKind = EntityKind::Event;

/// Provides CRUD, soft-delete and restore operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    ///
    /// Fails with a conflict if a live event already uses the name.
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> DbResult<Event> {
        input.validate()?;
        let query = format!(
            "INSERT INTO events (name, expiry)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&input.name)
            .bind(input.expiry)
            .fetch_one(pool)
            .await?;
        tracing::debug!(id = event.id, name = %event.name, "Event created");
        Ok(event)
    }

    /// Find an event by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Event>> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 AND deleted_at IS NULL");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(event)
    }

    /// Find an event by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(pool: &PgPool, id: DbId) -> DbResult<Option<Event>> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(event)
    }

    /// Find the live event with the given name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> DbResult<Option<Event>> {
        let query =
            format!("SELECT {COLUMNS} FROM events WHERE name = $1 AND deleted_at IS NULL");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(event)
    }

    /// List live events ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> DbResult<Vec<Event>> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC"
        );
        let events = sqlx::query_as::<_, Event>(&query).fetch_all(pool).await?;
        Ok(events)
    }

    /// Load a live event together with its live scenes and share links
    /// (expired links included).
    pub async fn find_with_children(
        pool: &PgPool,
        id: DbId,
    ) -> DbResult<Option<EventWithChildren>> {
        let Some(event) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let scenes = SceneRepo::list_by_event(pool, id).await?;
        let share_links = ShareLinkRepo::list_by_event(pool, id).await?;
        Ok(Some(EventWithChildren {
            event,
            scenes,
            share_links,
        }))
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> DbResult<Option<Event>> {
        input.validate()?;
        let query = format!(
            "UPDATE events SET
                name = COALESCE($2, name),
                expiry = COALESCE($3, expiry)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.expiry)
            .fetch_optional(pool)
            .await?;
        Ok(event)
    }

    /// Soft-delete an event together with its scenes, their media and its
    /// share links. Returns `false` if the event was already soft-deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        closure::soft_delete(pool, KIND, RowRef::Id(id)).await
    }

    /// Restore a soft-deleted event and the descendants deleted with it.
    /// Returns `false` if the event is not soft-deleted.
    pub async fn restore(pool: &PgPool, id: DbId) -> DbResult<bool> {
        closure::restore(pool, KIND, RowRef::Id(id)).await
    }

    /// Permanently delete an event. Scenes, media and share links go with it.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> DbResult<()> {
        closure::hard_delete(pool, KIND, RowRef::Id(id)).await
    }

    /// Delete every event and, through cascades, everything they own.
    pub async fn delete_all(pool: &PgPool) -> DbResult<u64> {
        closure::delete_all(pool, KIND).await
    }

    /// Like [`find_by_id`](Self::find_by_id) but fails with `NotFound`.
    pub async fn get(pool: &PgPool, id: DbId) -> DbResult<Event> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found(KIND.label(), id).into())
    }
}
