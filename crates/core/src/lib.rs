//! Domain types and rules for events, scenes, media and share links.
//!
//! This crate performs no I/O. The database crate builds its SQL from the
//! hierarchy described here and applies the soft-delete and share-link
//! rules defined in this crate.

pub mod error;
pub mod hierarchy;
pub mod share_link;
pub mod soft_delete;
pub mod types;
