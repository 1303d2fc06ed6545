// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for local development and tests.

use super::{apply_user_update, user_from_new, video_from_new, InsertedUser, Store};
use crate::error::AppError;
use crate::models::{NewUser, NewVideo, User, UserUpdate, Video, VideoUpdate};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Store backed by concurrent hash maps. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    /// Users keyed by external identity ID
    users: DashMap<String, User>,
    /// Internal user ID -> external identity ID
    user_ids: DashMap<String, String>,
    /// Email -> external identity ID (uniqueness index)
    emails: DashMap<String, String>,
    videos: DashMap<String, Video>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let Some(external_id) = self.user_ids.get(user_id).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&external_id).map(|u| u.value().clone()))
    }

    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AppError> {
        Ok(self.users.get(external_id).map(|u| u.value().clone()))
    }

    async fn insert_user_if_absent(
        &self,
        new_user: NewUser,
    ) -> Result<InsertedUser, AppError> {
        if let Some(existing) = self.users.get(&new_user.external_identity_id) {
            return Ok(InsertedUser {
                user: existing.value().clone(),
                created: false,
            });
        }

        // Claim the email first so two identities cannot share it.
        match self.emails.entry(new_user.email.clone()) {
            Entry::Occupied(owner) if *owner.get() != new_user.external_identity_id => {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    new_user.email
                )));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(new_user.external_identity_id.clone());
            }
        }

        let external_id = new_user.external_identity_id.clone();
        let (user, created) = match self.users.entry(external_id.clone()) {
            Entry::Occupied(existing) => (existing.get().clone(), false),
            Entry::Vacant(slot) => (slot.insert(user_from_new(new_user)).value().clone(), true),
        };
        self.user_ids.insert(user.id.clone(), external_id);

        Ok(InsertedUser { user, created })
    }

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User, AppError> {
        let not_found = || AppError::NotFound(format!("User {} not found", user_id));

        let external_id = self
            .user_ids
            .get(user_id)
            .map(|e| e.value().clone())
            .ok_or_else(not_found)?;
        let mut user = self.users.get_mut(&external_id).ok_or_else(not_found)?;

        apply_user_update(user.value_mut(), update);
        Ok(user.value().clone())
    }

    async fn list_videos(&self) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self.videos.iter().map(|v| v.value().clone()).collect();
        videos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(videos)
    }

    async fn get_video(&self, video_id: &str) -> Result<Option<Video>, AppError> {
        Ok(self.videos.get(video_id).map(|v| v.value().clone()))
    }

    async fn create_video(&self, new_video: NewVideo) -> Result<Video, AppError> {
        let video = video_from_new(new_video);
        self.videos.insert(video.id.clone(), video.clone());
        Ok(video)
    }

    async fn update_video(
        &self,
        video_id: &str,
        update: VideoUpdate,
    ) -> Result<Video, AppError> {
        let mut video = self
            .videos
            .get_mut(video_id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        update.apply_to(video.value_mut());
        video.updated_at = crate::time_utils::now_rfc3339();
        Ok(video.value().clone())
    }
}
