// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential and content store.
//!
//! Handlers depend on the [`Store`] trait; Firestore backs production and
//! [`MemoryStore`] backs local development and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{NewUser, NewVideo, User, UserUpdate, Video, VideoUpdate};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    /// Users, keyed by external identity ID
    pub const USERS: &str = "users";
    /// Videos, keyed by video ID
    pub const VIDEOS: &str = "videos";
}

/// Outcome of [`Store::insert_user_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsertedUser {
    pub user: User,
    /// False when another sign-in had already created the row
    pub created: bool,
}

/// Persistence operations used by the usecases.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Users ──────────────────────────────────────────────────

    /// Get a user by internal ID.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// Get a user by identity provider ID.
    async fn find_user_by_external_id(&self, external_id: &str)
        -> Result<Option<User>, AppError>;

    /// Create a user unless one already exists for the same external
    /// identity, in which case the existing row is returned unchanged.
    ///
    /// Must be a single atomic step keyed on `external_identity_id`.
    /// Fails with [`AppError::Conflict`] if another identity owns the email.
    async fn insert_user_if_absent(&self, new_user: NewUser)
        -> Result<InsertedUser, AppError>;

    /// Apply a profile update. Fails with [`AppError::NotFound`] if the user
    /// does not exist.
    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User, AppError>;

    // ─── Videos ─────────────────────────────────────────────────

    /// List all videos, newest first.
    async fn list_videos(&self) -> Result<Vec<Video>, AppError>;

    async fn get_video(&self, video_id: &str) -> Result<Option<Video>, AppError>;

    /// Insert a video with empty asset URLs.
    async fn create_video(&self, new_video: NewVideo) -> Result<Video, AppError>;

    /// Apply a partial update. Fails with [`AppError::NotFound`] if the
    /// video does not exist.
    async fn update_video(&self, video_id: &str, update: VideoUpdate)
        -> Result<Video, AppError>;
}

/// Build a fresh user row from sign-in data.
pub(crate) fn user_from_new(new_user: NewUser) -> User {
    let now = crate::time_utils::now_rfc3339();
    User {
        id: uuid::Uuid::new_v4().to_string(),
        external_identity_id: new_user.external_identity_id,
        email: new_user.email,
        display_name: new_user.display_name,
        avatar_url: new_user.avatar_url,
        created_at: now.clone(),
        updated_at: now,
    }
}

/// Build a fresh video row with placeholder URLs.
pub(crate) fn video_from_new(new_video: NewVideo) -> Video {
    let now = crate::time_utils::now_rfc3339();
    Video {
        id: uuid::Uuid::new_v4().to_string(),
        title: new_video.title,
        description: new_video.description,
        video_url: String::new(),
        thumbnail_url: String::new(),
        duration: new_video.duration,
        author_id: new_video.author_id,
        created_at: now.clone(),
        updated_at: now,
    }
}

/// Apply a profile update onto a stored user.
pub(crate) fn apply_user_update(user: &mut User, update: UserUpdate) {
    if let Some(display_name) = update.display_name {
        user.display_name = display_name;
    }
    if let Some(avatar_url) = update.avatar_url {
        user.avatar_url = Some(avatar_url);
    }
    user.updated_at = crate::time_utils::now_rfc3339();
}
