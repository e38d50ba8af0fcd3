//! Integration tests for the media `selected` toggle.

mod common;

use common::{new_media, wedding};
use eventshare_db::models::media::MediaFilter;
use eventshare_db::repositories::MediaRepo;
use sqlx::PgPool;

fn by_selection(scene_id: i64, selected: bool) -> MediaFilter {
    MediaFilter {
        scene_id: Some(scene_id),
        selected: Some(selected),
        ..MediaFilter::default()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_select_and_unselect(pool: PgPool) {
    let fx = wedding(&pool).await;

    let media = MediaRepo::set_selected(&pool, fx.media.id, true)
        .await
        .unwrap()
        .unwrap();
    assert!(media.selected);

    let media = MediaRepo::set_selected(&pool, fx.media.id, false)
        .await
        .unwrap()
        .unwrap();
    assert!(!media.selected);
    assert_eq!(media.web_resolution_url, fx.media.web_resolution_url);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_selected_and_unselected_partition_scene(pool: PgPool) {
    let fx = wedding(&pool).await;
    let b = MediaRepo::create(&pool, &new_media(fx.scene.id, "https://cdn.example.com/web/b.jpg"))
        .await
        .unwrap();
    let c = MediaRepo::create(&pool, &new_media(fx.scene.id, "https://cdn.example.com/web/c.jpg"))
        .await
        .unwrap();

    MediaRepo::set_selected(&pool, b.id, true).await.unwrap();

    let selected = MediaRepo::list(&pool, &by_selection(fx.scene.id, true))
        .await
        .unwrap();
    let unselected = MediaRepo::list(&pool, &by_selection(fx.scene.id, false))
        .await
        .unwrap();

    let selected_ids: Vec<_> = selected.iter().map(|m| m.id).collect();
    let unselected_ids: Vec<_> = unselected.iter().map(|m| m.id).collect();
    assert_eq!(selected_ids, vec![b.id]);
    assert_eq!(unselected_ids, vec![fx.media.id, c.id]);

    let everything = MediaRepo::list(
        &pool,
        &MediaFilter {
            scene_id: Some(fx.scene.id),
            ..MediaFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(everything.len(), selected.len() + unselected.len());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_select_is_idempotent(pool: PgPool) {
    let fx = wedding(&pool).await;

    let first = MediaRepo::set_selected(&pool, fx.media.id, true)
        .await
        .unwrap()
        .unwrap();
    let second = MediaRepo::set_selected(&pool, fx.media.id, true)
        .await
        .unwrap()
        .unwrap();
    assert!(first.selected && second.selected);

    let selected = MediaRepo::list(&pool, &by_selection(fx.scene.id, true))
        .await
        .unwrap();
    assert_eq!(selected.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_selection_survives_soft_delete_and_restore(pool: PgPool) {
    let fx = wedding(&pool).await;
    MediaRepo::set_selected(&pool, fx.media.id, true).await.unwrap();

    MediaRepo::soft_delete(&pool, fx.media.id).await.unwrap();
    assert!(MediaRepo::set_selected(&pool, fx.media.id, false)
        .await
        .unwrap()
        .is_none());

    MediaRepo::restore(&pool, fx.media.id).await.unwrap();
    let media = MediaRepo::find_by_id(&pool, fx.media.id).await.unwrap().unwrap();
    assert!(media.selected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_selected(pool: PgPool) {
    let fx = wedding(&pool).await;
    let mut input = new_media(fx.scene.id, "https://cdn.example.com/web/pick.jpg");
    input.selected = Some(true);

    let media = MediaRepo::create(&pool, &input).await.unwrap();
    assert!(media.selected);
}
