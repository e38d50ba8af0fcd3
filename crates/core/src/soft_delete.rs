//! Deletion-marker rules shared by every soft-deletable entity.
//!
//! A soft delete stamps the target row with a timestamp and copies that
//! exact timestamp (the closure marker) onto every descendant that is still
//! live. Rows that were already soft-deleted keep their older marker, so a
//! later restore of the ancestor, which only clears rows carrying the
//! closure marker, leaves them deleted.

use crate::types::Timestamp;

/// Returns `true` if a row with `own_marker` joins a soft delete whose
/// closure is being stamped now.
pub fn joins_closure(own_marker: Option<Timestamp>) -> bool {
    own_marker.is_none()
}

/// Returns `true` if restoring an ancestor deleted at `closure_marker` also
/// restores a descendant carrying `own_marker`.
pub fn restored_with(closure_marker: Timestamp, own_marker: Option<Timestamp>) -> bool {
    own_marker == Some(closure_marker)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
