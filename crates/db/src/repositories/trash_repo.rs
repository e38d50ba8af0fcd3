//! Repository for cross-table trash operations.
//!
//! Provides a unified view of soft-deleted rows across all entity tables,
//! plus bulk purge (hard delete) and the parent-status check needed by the
//! restore flow.

use eventshare_core::hierarchy::EntityKind;
use eventshare_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::repositories::closure;

/// A single soft-deleted item surfaced in the trash list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TrashedItem {
    pub id: DbId,
    pub entity_type: String,
    pub name_or_label: String,
    pub deleted_at: Timestamp,
}

/// Summary returned by [`TrashRepo::list_trashed`].
#[derive(Debug, Clone, Serialize)]
pub struct TrashSummary {
    pub items: Vec<TrashedItem>,
    pub total_count: i64,
}

/// Provides cross-table trash operations.
pub struct TrashRepo;

impl TrashRepo {
    // ── Listing ───────────────────────────────────────────────────────

    /// List soft-deleted items, newest first.
    ///
    /// When `kind` is `Some`, only that table is queried. Descendants deleted
    /// as part of an ancestor's closure are listed individually.
    pub async fn list_trashed(pool: &PgPool, kind: Option<EntityKind>) -> DbResult<TrashSummary> {
        let kinds: Vec<EntityKind> = match kind {
            Some(k) => vec![k],
            None => EntityKind::ALL.to_vec(),
        };
        let unions: Vec<String> = kinds
            .iter()
            .map(|k| {
                format!(
                    "SELECT id, '{}' AS entity_type, {} AS name_or_label, deleted_at \
                     FROM {} WHERE deleted_at IS NOT NULL",
                    k.as_str(),
                    k.display_column(),
                    k.table()
                )
            })
            .collect();
        let sql = format!(
            "{} ORDER BY deleted_at DESC, entity_type, id",
            unions.join(" UNION ALL ")
        );
        let items = sqlx::query_as::<_, TrashedItem>(&sql).fetch_all(pool).await?;
        let total_count = items.len() as i64;
        Ok(TrashSummary { items, total_count })
    }

    // ── Purge (hard delete) ───────────────────────────────────────────

    /// Hard-delete every soft-deleted row across all entity tables.
    ///
    /// Leaves are deleted first so the per-table counts are not skewed by
    /// foreign-key cascades.
    pub async fn purge_all(pool: &PgPool) -> DbResult<u64> {
        let mut total: u64 = 0;
        for kind in EntityKind::LEAVES_FIRST {
            let sql = format!("DELETE FROM {} WHERE deleted_at IS NOT NULL", kind.table());
            let result = sqlx::query(&sql).execute(pool).await?;
            total += result.rows_affected();
        }
        tracing::info!(purged = total, "Trash purged");
        Ok(total)
    }

    /// Hard-delete soft-deleted rows whose marker is older than `cutoff`.
    ///
    /// Parents are deleted after their children, and each parent delete
    /// cascades to every descendant. That cascade only stays within `cutoff`
    /// because a trashed row's descendants never carry a newer marker than
    /// it does: soft delete stamps live descendants with the parent's marker,
    /// and restore refuses to revive a row while an ancestor is trashed
    /// (see `closure::restore`). Relaxing that restore check would let this
    /// purge cascade into rows trashed after `cutoff`.
    pub async fn purge_older_than(pool: &PgPool, cutoff: Timestamp) -> DbResult<u64> {
        let mut total: u64 = 0;
        for kind in EntityKind::LEAVES_FIRST {
            let sql = format!("DELETE FROM {} WHERE deleted_at < $1", kind.table());
            let result = sqlx::query(&sql).bind(cutoff).execute(pool).await?;
            total += result.rows_affected();
        }
        Ok(total)
    }

    // ── Lookup helpers ────────────────────────────────────────────────

    /// Check whether an ancestor of a given entity is itself trashed.
    ///
    /// Returns `Some(description)` naming the nearest trashed ancestor, or
    /// `None` if all ancestors are live or the entity has no parent.
    pub async fn check_parent_trashed(
        pool: &PgPool,
        kind: EntityKind,
        id: DbId,
    ) -> DbResult<Option<String>> {
        let mut conn = pool.acquire().await?;
        let trashed = closure::trashed_ancestor(&mut conn, kind, id).await?;
        Ok(trashed.map(|parent| {
            format!(
                "Cannot restore: parent {} is trashed. Restore the parent first.",
                parent.as_str()
            )
        }))
    }
}
