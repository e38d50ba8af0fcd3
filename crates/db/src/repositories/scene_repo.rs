//! Repository for the `scenes` table.

use eventshare_core::error::CoreError;
use eventshare_core::hierarchy::EntityKind;
use eventshare_core::types::DbId;
use sqlx::PgPool;
use validator::Validate;

use crate::error::DbResult;
use crate::models::media::MediaFilter;
use crate::models::scene::{CreateScene, Scene, SceneWithMedia, UpdateScene};
use crate::repositories::closure::{self, live_condition, live_parent_exists, RowRef};
use crate::repositories::MediaRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, name, deleted_at, created_at, updated_at";

const KIND: EntityKind = EntityKind::Scene;

/// Provides CRUD, soft-delete and restore operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a new scene under a live event, returning the created row.
    ///
    /// Fails with `NotFound` if the event is missing or soft-deleted, and
    /// with a conflict if a live scene of the same event uses the name.
    pub async fn create(pool: &PgPool, input: &CreateScene) -> DbResult<Scene> {
        input.validate()?;
        let query = format!(
            "INSERT INTO scenes (event_id, name)
             SELECT $1::bigint, $2::text
             WHERE {}
             RETURNING {COLUMNS}",
            live_parent_exists(EntityKind::Event, "$1")
        );
        let scene = sqlx::query_as::<_, Scene>(&query)
            .bind(input.event_id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityKind::Event.label(), input.event_id))?;
        tracing::debug!(id = scene.id, event_id = scene.event_id, "Scene created");
        Ok(scene)
    }

    /// Find a scene by its internal ID. Excludes soft-deleted rows and rows
    /// whose event is soft-deleted.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Scene>> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE id = $1 AND {}",
            live_condition(KIND)
        );
        let scene = sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(scene)
    }

    /// Find a scene by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(pool: &PgPool, id: DbId) -> DbResult<Option<Scene>> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        let scene = sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(scene)
    }

    /// Find the live scene with the given name within an event.
    pub async fn find_by_name(
        pool: &PgPool,
        event_id: DbId,
        name: &str,
    ) -> DbResult<Option<Scene>> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE event_id = $1 AND name = $2 AND {}",
            live_condition(KIND)
        );
        let scene = sqlx::query_as::<_, Scene>(&query)
            .bind(event_id)
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(scene)
    }

    /// List live scenes of an event, oldest first.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> DbResult<Vec<Scene>> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes
             WHERE event_id = $1 AND {}
             ORDER BY created_at ASC, id ASC",
            live_condition(KIND)
        );
        let scenes = sqlx::query_as::<_, Scene>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await?;
        Ok(scenes)
    }

    /// Load a live scene together with its live media.
    pub async fn find_with_media(pool: &PgPool, id: DbId) -> DbResult<Option<SceneWithMedia>> {
        let Some(scene) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let filter = MediaFilter {
            scene_id: Some(id),
            ..MediaFilter::default()
        };
        let media = MediaRepo::list(pool, &filter).await?;
        Ok(Some(SceneWithMedia { scene, media }))
    }

    /// Rename a scene. Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScene,
    ) -> DbResult<Option<Scene>> {
        input.validate()?;
        let query = format!(
            "UPDATE scenes SET
                name = COALESCE($2, name)
             WHERE id = $1 AND {}
             RETURNING {COLUMNS}",
            live_condition(KIND)
        );
        let scene = sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await?;
        Ok(scene)
    }

    /// Soft-delete a scene and its media. Returns `false` if the scene was
    /// already soft-deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        closure::soft_delete(pool, KIND, RowRef::Id(id)).await
    }

    /// Restore a soft-deleted scene and the media deleted with it.
    ///
    /// Fails with a conflict while the owning event is soft-deleted.
    pub async fn restore(pool: &PgPool, id: DbId) -> DbResult<bool> {
        closure::restore(pool, KIND, RowRef::Id(id)).await
    }

    /// Permanently delete a scene and its media.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> DbResult<()> {
        closure::hard_delete(pool, KIND, RowRef::Id(id)).await
    }

    /// Delete every scene and, through cascades, all media.
    pub async fn delete_all(pool: &PgPool) -> DbResult<u64> {
        closure::delete_all(pool, KIND).await
    }
}
