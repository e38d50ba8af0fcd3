//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Soft delete, restore and hard
//! delete share one implementation in the `closure` module.

mod closure;

pub mod event_repo;
pub mod media_repo;
pub mod scene_repo;
pub mod share_link_repo;
pub mod trash_repo;

pub use event_repo::EventRepo;
pub use media_repo::MediaRepo;
pub use scene_repo::SceneRepo;
pub use share_link_repo::ShareLinkRepo;
pub use trash_repo::TrashRepo;
