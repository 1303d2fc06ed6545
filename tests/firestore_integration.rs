// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test firestore_integration
//!
//! The emulator provides a clean state for each test run.

use guild_api::db::Store;
use guild_api::error::AppError;
use guild_api::models::{NewUser, NewVideo, UserUpdate, VideoUpdate};
use std::sync::Arc;

mod common;
use common::test_db;

/// Generate a unique suffix for test isolation.
fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn new_user(external_id: &str, email: &str) -> NewUser {
    NewUser {
        external_identity_id: external_id.to_string(),
        email: email.to_string(),
        display_name: "Test".to_string(),
        avatar_url: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_insert_is_idempotent() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let external_id = format!("ext_{suffix}");
    let email = format!("{suffix}@example.com");

    // Initially, user should not exist
    let before = db.find_user_by_external_id(&external_id).await.unwrap();
    assert!(before.is_none(), "User should not exist before creation");

    let first = db
        .insert_user_if_absent(new_user(&external_id, &email))
        .await
        .unwrap();
    let second = db
        .insert_user_if_absent(new_user(&external_id, &email))
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.user.id, second.user.id);

    let by_id = db.get_user(&first.user.id).await.unwrap().unwrap();
    assert_eq!(by_id.external_identity_id, external_id);
}

#[tokio::test]
async fn test_concurrent_inserts_yield_one_user() {
    require_emulator!();

    let db = Arc::new(test_db().await);
    let suffix = unique_suffix();
    let external_id = format!("ext_{suffix}");
    let email = format!("{suffix}@example.com");

    let mut handles = Vec::new();
    for _ in 0..4 {
        let db = db.clone();
        let user = new_user(&external_id, &email);
        handles.push(tokio::spawn(async move {
            db.insert_user_if_absent(user).await.unwrap()
        }));
    }

    let mut ids = Vec::new();
    let mut creations = 0;
    for handle in handles {
        let inserted = handle.await.unwrap();
        if inserted.created {
            creations += 1;
        }
        ids.push(inserted.user.id);
    }
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(creations, 1);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let email = format!("{suffix}@example.com");

    db.insert_user_if_absent(new_user(&format!("a_{suffix}"), &email))
        .await
        .unwrap();
    let err = db
        .insert_user_if_absent(new_user(&format!("b_{suffix}"), &email))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_user_update_preserves_other_fields() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let user = db
        .insert_user_if_absent(new_user(
            &format!("ext_{suffix}"),
            &format!("{suffix}@example.com"),
        ))
        .await
        .unwrap()
        .user;

    let updated = db
        .update_user(
            &user.id,
            UserUpdate {
                avatar_url: Some("https://cdn.example.com/p.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, user.display_name);
    assert_eq!(updated.email, user.email);
    assert_eq!(
        updated.avatar_url.as_deref(),
        Some("https://cdn.example.com/p.png")
    );
    assert_eq!(updated.created_at, user.created_at);
}

// ═══════════════════════════════════════════════════════════════════════════
// VIDEO TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_video_create_and_patch() {
    require_emulator!();

    let db = test_db().await;
    let video = db
        .create_video(NewVideo {
            title: "Intro".to_string(),
            description: String::new(),
            duration: 60,
            author_id: "author".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(video.video_url, "");

    let patched = db
        .update_video(
            &video.id,
            VideoUpdate {
                thumbnail_url: Some("https://cdn.example.com/t.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.title, "Intro");
    assert_eq!(patched.video_url, "");
    assert_eq!(patched.thumbnail_url, "https://cdn.example.com/t.png");

    let fetched = db.get_video(&video.id).await.unwrap().unwrap();
    assert_eq!(fetched, patched);
}

#[tokio::test]
async fn test_missing_video() {
    require_emulator!();

    let db = test_db().await;
    assert!(db.get_video("missing").await.unwrap().is_none());

    let err = db
        .update_video("missing", VideoUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
