//! Hierarchy-aware helpers shared by the entity repositories.
//!
//! SQL here is generated from [`EntityKind`] so the four repositories agree
//! on what "live" means and on which rows a soft delete or restore touches.

use std::fmt;

use eventshare_core::error::CoreError;
use eventshare_core::hierarchy::EntityKind;
use eventshare_core::soft_delete::{joins_closure, restored_with};
use eventshare_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::error::DbResult;

/// How the root row of an operation is addressed.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RowRef<'a> {
    Id(DbId),
    Key(&'a str),
}

impl RowRef<'_> {
    fn column(self) -> &'static str {
        match self {
            RowRef::Id(_) => "id",
            RowRef::Key(_) => "key",
        }
    }
}

impl fmt::Display for RowRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRef::Id(id) => write!(f, "{id}"),
            RowRef::Key(key) => f.write_str(key),
        }
    }
}

// ---------------------------------------------------------------------------
// SQL builders
// ---------------------------------------------------------------------------

/// Predicate over unqualified columns of `kind` that holds when neither the
/// row nor any of its ancestors is soft-deleted.
pub(crate) fn live_condition(kind: EntityKind) -> String {
    match kind.parent() {
        None => "deleted_at IS NULL".to_string(),
        Some((parent, fk)) => format!(
            "deleted_at IS NULL AND {fk} IN (SELECT id FROM {} WHERE {})",
            parent.table(),
            live_condition(parent)
        ),
    }
}

/// `EXISTS` clause that holds when the `parent` row bound at `param` is live.
pub(crate) fn live_parent_exists(parent: EntityKind, param: &str) -> String {
    format!(
        "EXISTS (SELECT 1 FROM {} WHERE id = {param} AND {})",
        parent.table(),
        live_condition(parent)
    )
}

/// Predicate over unqualified columns of `kind` selecting rows owned,
/// directly or transitively, by the `root` row whose id is bound at `param`.
///
/// Returns `None` when `kind` is not a descendant of `root`.
pub(crate) fn owned_by(kind: EntityKind, root: EntityKind, param: &str) -> Option<String> {
    let (parent, fk) = kind.parent()?;
    if parent == root {
        return Some(format!("{fk} = {param}"));
    }
    let inner = owned_by(parent, root, param)?;
    Some(format!(
        "{fk} IN (SELECT id FROM {} WHERE {inner})",
        parent.table()
    ))
}

/// Stamps the root of a soft delete and returns the closure marker.
///
/// The marker is `clock_timestamp()` read under the row lock, not the
/// transaction start time, so each closure gets its own marker.
fn stamp_root_sql(kind: EntityKind) -> String {
    format!(
        "UPDATE {} SET deleted_at = clock_timestamp() WHERE id = $1 RETURNING deleted_at",
        kind.table()
    )
}

// ---------------------------------------------------------------------------
// Closure operations
// ---------------------------------------------------------------------------

/// Lock the root row and return its id and current deletion marker.
async fn lock_row(
    conn: &mut PgConnection,
    kind: EntityKind,
    row: RowRef<'_>,
) -> DbResult<(DbId, Option<Timestamp>)> {
    let sql = format!(
        "SELECT id, deleted_at FROM {} WHERE {} = $1 FOR UPDATE",
        kind.table(),
        row.column()
    );
    let query = sqlx::query_as::<_, (DbId, Option<Timestamp>)>(&sql);
    let query = match row {
        RowRef::Id(id) => query.bind(id),
        RowRef::Key(key) => query.bind(key),
    };
    query
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| CoreError::not_found(kind.label(), row).into())
}

/// Find the nearest soft-deleted ancestor of the given row, if any.
pub(crate) async fn trashed_ancestor(
    conn: &mut PgConnection,
    kind: EntityKind,
    id: DbId,
) -> DbResult<Option<EntityKind>> {
    let mut current = (kind, id);
    while let Some((parent, fk)) = current.0.parent() {
        let sql = format!(
            "SELECT p.id, p.deleted_at FROM {} c JOIN {} p ON p.id = c.{fk} WHERE c.id = $1",
            current.0.table(),
            parent.table()
        );
        let row: Option<(DbId, Option<Timestamp>)> = sqlx::query_as(&sql)
            .bind(current.1)
            .fetch_optional(&mut *conn)
            .await?;
        match row {
            None => return Ok(None),
            Some((_, Some(_))) => return Ok(Some(parent)),
            Some((parent_id, None)) => current = (parent, parent_id),
        }
    }
    Ok(None)
}

/// Soft-delete a row and every still-live descendant in one transaction.
///
/// All touched rows receive the same marker. Returns `false` if the row was
/// already soft-deleted.
pub(crate) async fn soft_delete(pool: &PgPool, kind: EntityKind, row: RowRef<'_>) -> DbResult<bool> {
    let mut tx = pool.begin().await?;

    let (id, marker) = lock_row(&mut tx, kind, row).await?;
    if !joins_closure(marker) {
        return Ok(false);
    }

    let update_root = stamp_root_sql(kind);
    let (stamp,): (Timestamp,) = sqlx::query_as(&update_root)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    let mut cascaded: u64 = 0;
    for child in kind.descendants() {
        let Some(scope) = owned_by(child, kind, "$1") else {
            continue;
        };
        let sql = format!(
            "UPDATE {} SET deleted_at = $2 WHERE {scope} AND deleted_at IS NULL",
            child.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(stamp)
            .execute(&mut *tx)
            .await?;
        cascaded += result.rows_affected();
    }

    tx.commit().await?;
    tracing::info!(entity = %kind, id, cascaded, "Soft-deleted with descendants");
    Ok(true)
}

/// Restore a soft-deleted row and the descendants that share its marker.
///
/// Returns `false` if the row is not soft-deleted. Fails with
/// [`CoreError::Conflict`] if an ancestor is still soft-deleted or if a
/// restored row would collide with a live sibling; nothing is changed in
/// either case.
pub(crate) async fn restore(pool: &PgPool, kind: EntityKind, row: RowRef<'_>) -> DbResult<bool> {
    let mut tx = pool.begin().await?;

    let (id, marker) = lock_row(&mut tx, kind, row).await?;
    let Some(stamp) = marker else {
        return Ok(false);
    };

    if let Some(parent) = trashed_ancestor(&mut tx, kind, id).await? {
        return Err(CoreError::Conflict(format!(
            "Cannot restore: parent {} is trashed. Restore the parent first.",
            parent.as_str()
        ))
        .into());
    }

    let update_root = format!("UPDATE {} SET deleted_at = NULL WHERE id = $1", kind.table());
    sqlx::query(&update_root).bind(id).execute(&mut *tx).await?;

    let mut cascaded: u64 = 0;
    for child in kind.descendants() {
        let Some(scope) = owned_by(child, kind, "$1") else {
            continue;
        };
        let select = format!(
            "SELECT id, deleted_at FROM {} WHERE {scope} AND deleted_at IS NOT NULL FOR UPDATE",
            child.table()
        );
        let trashed: Vec<(DbId, Option<Timestamp>)> = sqlx::query_as(&select)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        let ids: Vec<DbId> = trashed
            .into_iter()
            .filter(|(_, own)| restored_with(stamp, *own))
            .map(|(child_id, _)| child_id)
            .collect();
        if ids.is_empty() {
            continue;
        }
        let sql = format!(
            "UPDATE {} SET deleted_at = NULL WHERE id = ANY($1)",
            child.table()
        );
        let result = sqlx::query(&sql).bind(&ids).execute(&mut *tx).await?;
        cascaded += result.rows_affected();
    }

    tx.commit().await?;
    tracing::info!(entity = %kind, id, cascaded, "Restored with descendants");
    Ok(true)
}

/// Permanently delete a row. Foreign keys cascade the delete to descendants.
pub(crate) async fn hard_delete(pool: &PgPool, kind: EntityKind, row: RowRef<'_>) -> DbResult<()> {
    let sql = format!("DELETE FROM {} WHERE {} = $1", kind.table(), row.column());
    let query = sqlx::query(&sql);
    let query = match row {
        RowRef::Id(id) => query.bind(id),
        RowRef::Key(key) => query.bind(key),
    };
    let result = query.execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(CoreError::not_found(kind.label(), row).into());
    }
    tracing::debug!(entity = %kind, key = %row, "Hard-deleted");
    Ok(())
}

/// Delete every row of `kind`, live or not. Returns the number removed.
pub(crate) async fn delete_all(pool: &PgPool, kind: EntityKind) -> DbResult<u64> {
    let sql = format!("DELETE FROM {}", kind.table());
    let result = sqlx::query(&sql).execute(pool).await?;
    Ok(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
