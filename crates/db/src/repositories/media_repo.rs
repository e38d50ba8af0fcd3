//! Repository for the `media` table.

use eventshare_core::error::CoreError;
use eventshare_core::hierarchy::EntityKind;
use eventshare_core::types::DbId;
use sqlx::PgPool;
use validator::Validate;

use crate::error::DbResult;
use crate::models::media::{CreateMedia, Media, MediaFilter, UpdateMedia};
use crate::repositories::closure::{self, live_condition, live_parent_exists, RowRef};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scene_id, web_resolution_url, high_resolution_url, \
    image_order, selected, deleted_at, created_at, updated_at";

const KIND: EntityKind = EntityKind::Media;

/// Provides CRUD, selection, soft-delete and restore operations for media.
pub struct MediaRepo;

impl MediaRepo {
    /// Insert a new media item under a live scene, returning the created row.
    ///
    /// `image_order` defaults to 0 and `selected` to `false`. Fails with
    /// `NotFound` if the scene (or its event) is missing or soft-deleted, and
    /// with a conflict if a live media item of the same scene already uses
    /// the web-resolution URL.
    pub async fn create(pool: &PgPool, input: &CreateMedia) -> DbResult<Media> {
        input.validate()?;
        let query = format!(
            "INSERT INTO media
                (scene_id, web_resolution_url, high_resolution_url, image_order, selected)
             SELECT $1::bigint, $2::text, $3::text,
                    COALESCE($4::integer, 0), COALESCE($5::boolean, false)
             WHERE {}
             RETURNING {COLUMNS}",
            live_parent_exists(EntityKind::Scene, "$1")
        );
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(input.scene_id)
            .bind(&input.web_resolution_url)
            .bind(&input.high_resolution_url)
            .bind(input.image_order)
            .bind(input.selected)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityKind::Scene.label(), input.scene_id))?;
        tracing::debug!(id = media.id, scene_id = media.scene_id, "Media created");
        Ok(media)
    }

    /// Find a media item by its internal ID. Excludes soft-deleted rows and
    /// rows whose scene or event is soft-deleted.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Media>> {
        let query = format!(
            "SELECT {COLUMNS} FROM media WHERE id = $1 AND {}",
            live_condition(KIND)
        );
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(media)
    }

    /// Find a media item by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(pool: &PgPool, id: DbId) -> DbResult<Option<Media>> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(media)
    }

    /// List live media matching `filter`, ordered by `image_order` then id.
    pub async fn list(pool: &PgPool, filter: &MediaFilter) -> DbResult<Vec<Media>> {
        // The live condition occupies the first slot, so each pushed
        // condition's placeholder index equals the vector length before push.
        let mut conditions = vec![live_condition(KIND)];
        if filter.scene_id.is_some() {
            conditions.push(format!("scene_id = ${}", conditions.len()));
        }
        if filter.selected.is_some() {
            conditions.push(format!("selected = ${}", conditions.len()));
        }
        if filter.web_resolution_url.is_some() {
            conditions.push(format!("web_resolution_url = ${}", conditions.len()));
        }

        let query = format!(
            "SELECT {COLUMNS} FROM media WHERE {} ORDER BY image_order ASC, id ASC",
            conditions.join(" AND ")
        );
        let mut q = sqlx::query_as::<_, Media>(&query);
        if let Some(scene_id) = filter.scene_id {
            q = q.bind(scene_id);
        }
        if let Some(selected) = filter.selected {
            q = q.bind(selected);
        }
        if let Some(url) = &filter.web_resolution_url {
            q = q.bind(url);
        }
        let media = q.fetch_all(pool).await?;
        Ok(media)
    }

    /// Update a media item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMedia,
    ) -> DbResult<Option<Media>> {
        input.validate()?;
        let query = format!(
            "UPDATE media SET
                web_resolution_url = COALESCE($2, web_resolution_url),
                high_resolution_url = COALESCE($3, high_resolution_url),
                image_order = COALESCE($4, image_order),
                selected = COALESCE($5, selected)
             WHERE id = $1 AND {}
             RETURNING {COLUMNS}",
            live_condition(KIND)
        );
        let media = sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(&input.web_resolution_url)
            .bind(&input.high_resolution_url)
            .bind(input.image_order)
            .bind(input.selected)
            .fetch_optional(pool)
            .await?;
        Ok(media)
    }

    /// Set the `selected` flag. Setting the current value again is a no-op.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn set_selected(pool: &PgPool, id: DbId, selected: bool) -> DbResult<Option<Media>> {
        let input = UpdateMedia {
            selected: Some(selected),
            ..UpdateMedia::default()
        };
        Self::update(pool, id, &input).await
    }

    /// Soft-delete a media item. Returns `false` if it was already soft-deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        closure::soft_delete(pool, KIND, RowRef::Id(id)).await
    }

    /// Restore a soft-deleted media item.
    ///
    /// Fails with a conflict while its scene or event is soft-deleted.
    pub async fn restore(pool: &PgPool, id: DbId) -> DbResult<bool> {
        closure::restore(pool, KIND, RowRef::Id(id)).await
    }

    /// Permanently delete a media item.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> DbResult<()> {
        closure::hard_delete(pool, KIND, RowRef::Id(id)).await
    }

    /// Delete every media row.
    pub async fn delete_all(pool: &PgPool) -> DbResult<u64> {
        closure::delete_all(pool, KIND).await
    }
}
