//! Shared fixtures for the repository integration tests.

#![allow(dead_code)]

use chrono::{Duration, SubsecRound, Utc};
use eventshare_core::types::{DbId, Timestamp};
use eventshare_db::models::event::{CreateEvent, Event};
use eventshare_db::models::media::{CreateMedia, Media};
use eventshare_db::models::scene::{CreateScene, Scene};
use eventshare_db::models::share_link::{CreateShareLink, ShareLink};
use eventshare_db::repositories::{EventRepo, MediaRepo, SceneRepo, ShareLinkRepo};
use sqlx::PgPool;

/// Whole seconds, so values survive the microsecond round trip unchanged.
pub fn days_from_now(days: i64) -> Timestamp {
    Utc::now().trunc_subsecs(0) + Duration::days(days)
}

// ---------------------------------------------------------------------------
// DTO builders
// ---------------------------------------------------------------------------

pub fn new_event(name: &str) -> CreateEvent {
    CreateEvent {
        name: name.to_string(),
        expiry: days_from_now(30),
    }
}

pub fn new_scene(event_id: DbId, name: &str) -> CreateScene {
    CreateScene {
        event_id,
        name: name.to_string(),
    }
}

pub fn new_media(scene_id: DbId, web_url: &str) -> CreateMedia {
    CreateMedia {
        scene_id,
        web_resolution_url: web_url.to_string(),
        high_resolution_url: web_url.replace("/web/", "/full/"),
        image_order: Some(1),
        selected: None,
    }
}

pub fn new_share_link(event_id: DbId, key: &str, expiry: Timestamp) -> CreateShareLink {
    CreateShareLink {
        event_id,
        key: Some(key.to_string()),
        expiry: Some(expiry),
    }
}

// ---------------------------------------------------------------------------
// Hierarchy builders
// ---------------------------------------------------------------------------

/// One of everything: event -> scene -> media, plus a valid share link.
pub struct Fixture {
    pub event: Event,
    pub scene: Scene,
    pub media: Media,
    pub share_link: ShareLink,
}

pub async fn wedding(pool: &PgPool) -> Fixture {
    let event = EventRepo::create(pool, &new_event("Wedding")).await.unwrap();
    let scene = SceneRepo::create(pool, &new_scene(event.id, "Ceremony"))
        .await
        .unwrap();
    let media = MediaRepo::create(
        pool,
        &new_media(scene.id, "https://cdn.example.com/web/a.jpg"),
    )
    .await
    .unwrap();
    let share_link = ShareLinkRepo::create(
        pool,
        &new_share_link(event.id, "wedding-guests", days_from_now(7)),
    )
    .await
    .unwrap();
    Fixture {
        event,
        scene,
        media,
        share_link,
    }
}
