//! Integration tests for the cross-table trash view and purges.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::{new_event, wedding};
use eventshare_core::error::CoreError;
use eventshare_core::hierarchy::EntityKind;
use eventshare_db::repositories::{EventRepo, MediaRepo, SceneRepo, ShareLinkRepo, TrashRepo};
use eventshare_db::DbError;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_trash(pool: PgPool) {
    wedding(&pool).await;

    let summary = TrashRepo::list_trashed(&pool, None).await.unwrap();
    assert!(summary.items.is_empty());
    assert_eq!(summary.total_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_trashed_covers_closure(pool: PgPool) {
    let fx = wedding(&pool).await;
    EventRepo::soft_delete(&pool, fx.event.id).await.unwrap();

    let summary = TrashRepo::list_trashed(&pool, None).await.unwrap();
    assert_eq!(summary.total_count, 4);

    let mut labels: Vec<_> = summary
        .items
        .iter()
        .map(|item| (item.entity_type.as_str(), item.name_or_label.as_str()))
        .collect();
    labels.sort();
    assert_eq!(
        labels,
        vec![
            ("event", "Wedding"),
            ("media", "https://cdn.example.com/web/a.jpg"),
            ("scene", "Ceremony"),
            ("share_link", "wedding-guests"),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_trashed_by_kind_newest_first(pool: PgPool) {
    let fx = wedding(&pool).await;
    let gala = EventRepo::create(&pool, &new_event("Gala")).await.unwrap();

    MediaRepo::soft_delete(&pool, fx.media.id).await.unwrap();
    EventRepo::soft_delete(&pool, gala.id).await.unwrap();
    EventRepo::soft_delete(&pool, fx.event.id).await.unwrap();

    let events = TrashRepo::list_trashed(&pool, Some(EntityKind::Event))
        .await
        .unwrap();
    let ids: Vec<_> = events.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![fx.event.id, gala.id]);
    assert!(events.items.iter().all(|item| item.entity_type == "event"));

    let media = TrashRepo::list_trashed(&pool, Some(EntityKind::Media))
        .await
        .unwrap();
    assert_eq!(media.total_count, 1);
    assert_eq!(media.items[0].id, fx.media.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_all_removes_only_trashed(pool: PgPool) {
    let fx = wedding(&pool).await;
    let gala = EventRepo::create(&pool, &new_event("Gala")).await.unwrap();
    EventRepo::soft_delete(&pool, fx.event.id).await.unwrap();

    let purged = TrashRepo::purge_all(&pool).await.unwrap();
    assert_eq!(purged, 4);

    assert!(EventRepo::find_by_id_include_deleted(&pool, fx.event.id)
        .await
        .unwrap()
        .is_none());
    assert!(ShareLinkRepo::find_by_key_include_deleted(&pool, &fx.share_link.key)
        .await
        .unwrap()
        .is_none());
    assert!(EventRepo::find_by_id(&pool, gala.id).await.unwrap().is_some());
    assert!(TrashRepo::list_trashed(&pool, None)
        .await
        .unwrap()
        .items
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_older_than_respects_cutoff(pool: PgPool) {
    let fx = wedding(&pool).await;
    SceneRepo::soft_delete(&pool, fx.scene.id).await.unwrap();

    // Nothing is older than an hour ago.
    let purged = TrashRepo::purge_older_than(&pool, Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(purged, 0);
    assert!(SceneRepo::find_by_id_include_deleted(&pool, fx.scene.id)
        .await
        .unwrap()
        .is_some());

    // Everything trashed so far is older than a minute from now.
    let purged = TrashRepo::purge_older_than(&pool, Utc::now() + Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(purged, 2, "scene and its media");
    assert!(MediaRepo::find_by_id_include_deleted(&pool, fx.media.id)
        .await
        .unwrap()
        .is_none());
    assert!(EventRepo::find_by_id(&pool, fx.event.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_older_than_keeps_parent_trashed_after_cutoff(pool: PgPool) {
    let fx = wedding(&pool).await;
    MediaRepo::soft_delete(&pool, fx.media.id).await.unwrap();
    SceneRepo::soft_delete(&pool, fx.scene.id).await.unwrap();

    // The media cannot come back under its trashed scene, so it never
    // outlives the scene's marker.
    let err = MediaRepo::restore(&pool, fx.media.id).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Conflict(_)));

    let media_marker = MediaRepo::find_by_id_include_deleted(&pool, fx.media.id)
        .await
        .unwrap()
        .unwrap()
        .deleted_at
        .unwrap();
    let scene_marker = SceneRepo::find_by_id_include_deleted(&pool, fx.scene.id)
        .await
        .unwrap()
        .unwrap()
        .deleted_at
        .unwrap();
    assert!(media_marker < scene_marker);

    let purged = TrashRepo::purge_older_than(&pool, scene_marker).await.unwrap();
    assert_eq!(purged, 1, "only the media is older than the cutoff");
    assert!(MediaRepo::find_by_id_include_deleted(&pool, fx.media.id)
        .await
        .unwrap()
        .is_none());
    let scene = SceneRepo::find_by_id_include_deleted(&pool, fx.scene.id)
        .await
        .unwrap()
        .expect("scene trashed at the cutoff stays");
    assert_eq!(scene.deleted_at, Some(scene_marker));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_parent_trashed(pool: PgPool) {
    let fx = wedding(&pool).await;

    let status = TrashRepo::check_parent_trashed(&pool, EntityKind::Media, fx.media.id)
        .await
        .unwrap();
    assert_eq!(status, None);

    SceneRepo::soft_delete(&pool, fx.scene.id).await.unwrap();
    let status = TrashRepo::check_parent_trashed(&pool, EntityKind::Media, fx.media.id)
        .await
        .unwrap()
        .expect("scene is trashed");
    assert!(status.contains("scene"), "{status}");

    let status = TrashRepo::check_parent_trashed(&pool, EntityKind::Event, fx.event.id)
        .await
        .unwrap();
    assert_eq!(status, None, "events have no parent");
}
