//! Ownership hierarchy of the soft-deletable entities.
//!
//! ```text
//! Event ─┬─ Scene ── Media
//!        └─ ShareLink
//! ```
//!
//! Every child row references its parent through a single foreign-key
//! column. Hard deletes cascade along these edges in the database; soft
//! deletes and restores walk the same edges in the repository layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four entity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Event,
    Scene,
    Media,
    ShareLink,
}

impl EntityKind {
    /// All kinds, roots before their children.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Event,
        EntityKind::Scene,
        EntityKind::Media,
        EntityKind::ShareLink,
    ];

    /// Kinds ordered so that children come before parents. Deleting in this
    /// order never relies on foreign-key cascades.
    pub const LEAVES_FIRST: [EntityKind; 4] = [
        EntityKind::Media,
        EntityKind::ShareLink,
        EntityKind::Scene,
        EntityKind::Event,
    ];

    /// Database table backing this kind.
    pub const fn table(self) -> &'static str {
        match self {
            EntityKind::Event => "events",
            EntityKind::Scene => "scenes",
            EntityKind::Media => "media",
            EntityKind::ShareLink => "share_links",
        }
    }

    /// Human-readable name used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Event => "Event",
            EntityKind::Scene => "Scene",
            EntityKind::Media => "Media",
            EntityKind::ShareLink => "ShareLink",
        }
    }

    /// Stable snake_case identifier, identical to the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Event => "event",
            EntityKind::Scene => "scene",
            EntityKind::Media => "media",
            EntityKind::ShareLink => "share_link",
        }
    }

    /// Column that best identifies a row to a human (name, URL or key).
    pub const fn display_column(self) -> &'static str {
        match self {
            EntityKind::Event | EntityKind::Scene => "name",
            EntityKind::Media => "web_resolution_url",
            EntityKind::ShareLink => "key",
        }
    }

    /// The owning kind and the foreign-key column pointing at it.
    pub const fn parent(self) -> Option<(EntityKind, &'static str)> {
        match self {
            EntityKind::Event => None,
            EntityKind::Scene => Some((EntityKind::Event, "event_id")),
            EntityKind::Media => Some((EntityKind::Scene, "scene_id")),
            EntityKind::ShareLink => Some((EntityKind::Event, "event_id")),
        }
    }

    /// Kinds directly owned by this one.
    pub const fn children(self) -> &'static [EntityKind] {
        match self {
            EntityKind::Event => &[EntityKind::Scene, EntityKind::ShareLink],
            EntityKind::Scene => &[EntityKind::Media],
            EntityKind::Media | EntityKind::ShareLink => &[],
        }
    }

    /// Every kind transitively owned by this one, breadth-first.
    pub fn descendants(self) -> Vec<EntityKind> {
        let mut out = Vec::new();
        let mut frontier = vec![self];
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for kind in frontier {
                for &child in kind.children() {
                    out.push(child);
                    next.push(child);
                }
            }
            frontier = next;
        }
        out
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_owns_everything() {
        assert_eq!(
            EntityKind::Event.descendants(),
            vec![EntityKind::Scene, EntityKind::ShareLink, EntityKind::Media]
        );
    }

    #[test]
    fn scene_owns_only_media() {
        assert_eq!(EntityKind::Scene.descendants(), vec![EntityKind::Media]);
    }

    #[test]
    fn leaves_have_no_descendants() {
        assert!(EntityKind::Media.descendants().is_empty());
        assert!(EntityKind::ShareLink.descendants().is_empty());
    }

    #[test]
    fn leaves_first_puts_children_before_parents() {
        let order = EntityKind::LEAVES_FIRST;
        for (i, kind) in order.iter().enumerate() {
            for later in &order[i + 1..] {
                assert!(
                    !kind.descendants().contains(later),
                    "{later} is owned by {kind} but is deleted after it"
                );
            }
        }
    }

    #[test]
    fn serde_matches_as_str() {
        for kind in EntityKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
