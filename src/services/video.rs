// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video usecases.
//!
//! A create or update writes the record first, then requests up to two
//! upload authorizations (video and thumbnail) and patches their public URLs
//! onto the record. The two writes are not atomic: if authorization fails
//! after the first write, the record keeps its previous (or empty) URLs and
//! the caller sees an error. Retrying the whole call is safe; it overwrites
//! the same record.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{FileUpload, NewVideo, UploadAuthorization, UploadPurpose, Video, VideoUpdate};
use crate::services::uploads::UploadBroker;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Editable video fields plus optional file slots.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct VideoInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: String,
    /// Length in seconds
    #[validate(range(min = 1))]
    pub duration: u32,
    #[serde(default)]
    #[validate(nested)]
    pub video_file: Option<FileUpload>,
    #[serde(default)]
    #[validate(nested)]
    pub thumbnail_file: Option<FileUpload>,
}

/// Outcome of a create/update: the final record and any authorizations.
#[derive(Debug, Clone)]
pub struct VideoMutation {
    pub video: Video,
    pub video_upload: Option<UploadAuthorization>,
    pub thumbnail_upload: Option<UploadAuthorization>,
}

#[derive(Clone)]
pub struct VideoService {
    store: Arc<dyn Store>,
    uploads: UploadBroker,
}

impl VideoService {
    pub fn new(store: Arc<dyn Store>, uploads: UploadBroker) -> Self {
        Self { store, uploads }
    }

    pub async fn list(&self) -> Result<Vec<Video>, AppError> {
        self.store.list_videos().await
    }

    /// `Ok(None)` when no video has this ID.
    pub async fn get(&self, video_id: &str) -> Result<Option<Video>, AppError> {
        self.store.get_video(video_id).await
    }

    pub async fn create(&self, author_id: &str, input: VideoInput) -> Result<VideoMutation, AppError> {
        input.validate()?;

        let created = self
            .store
            .create_video(NewVideo {
                title: input.title,
                description: input.description,
                duration: input.duration,
                author_id: author_id.to_string(),
            })
            .await?;

        tracing::info!(video_id = %created.id, author_id, "Video created");

        self.apply_uploads(created, input.video_file.as_ref(), input.thumbnail_file.as_ref())
            .await
    }

    /// Overwrite the editable fields of an existing video. The caller
    /// becomes its author.
    pub async fn update(
        &self,
        author_id: &str,
        video_id: &str,
        input: VideoInput,
    ) -> Result<VideoMutation, AppError> {
        input.validate()?;

        let updated = self
            .store
            .update_video(
                video_id,
                VideoUpdate {
                    title: Some(input.title),
                    description: Some(input.description),
                    duration: Some(input.duration),
                    author_id: Some(author_id.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(video_id, author_id, "Video updated");

        self.apply_uploads(updated, input.video_file.as_ref(), input.thumbnail_file.as_ref())
            .await
    }

    /// Authorize requested uploads and patch their public URLs onto `current`.
    async fn apply_uploads(
        &self,
        current: Video,
        video_file: Option<&FileUpload>,
        thumbnail_file: Option<&FileUpload>,
    ) -> Result<VideoMutation, AppError> {
        let video_upload = match video_file {
            Some(file) => Some(
                self.uploads
                    .authorize_upload(&current.id, UploadPurpose::Video, file)
                    .await?,
            ),
            None => None,
        };
        let thumbnail_upload = match thumbnail_file {
            Some(file) => Some(
                self.uploads
                    .authorize_upload(&current.id, UploadPurpose::Thumbnail, file)
                    .await?,
            ),
            None => None,
        };

        if video_upload.is_none() && thumbnail_upload.is_none() {
            return Ok(VideoMutation {
                video: current,
                video_upload,
                thumbnail_upload,
            });
        }

        let video = self
            .store
            .update_video(
                &current.id,
                VideoUpdate {
                    video_url: video_upload.as_ref().map(|u| u.public_url.clone()),
                    thumbnail_url: thumbnail_upload.as_ref().map(|u| u.public_url.clone()),
                    ..Default::default()
                },
            )
            .await?;

        Ok(VideoMutation {
            video,
            video_upload,
            thumbnail_upload,
        })
    }
}
