// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video lesson model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored video record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct Video {
    /// Generated ID (also used as document ID)
    pub id: String,
    pub title: String,
    pub description: String,
    /// Public URL of the video object; empty until an upload is authorized
    pub video_url: String,
    /// Public URL of the thumbnail object; empty until an upload is authorized
    pub thumbnail_url: String,
    /// Length in seconds
    pub duration: u32,
    /// User who last wrote the record
    pub author_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for a new video.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub duration: u32,
    pub author_id: String,
}

/// Partial video update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u32>,
    pub author_id: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl VideoUpdate {
    /// Apply the set fields onto `video`.
    pub fn apply_to(self, video: &mut Video) {
        if let Some(title) = self.title {
            video.title = title;
        }
        if let Some(description) = self.description {
            video.description = description;
        }
        if let Some(duration) = self.duration {
            video.duration = duration;
        }
        if let Some(author_id) = self.author_id {
            video.author_id = author_id;
        }
        if let Some(video_url) = self.video_url {
            video.video_url = video_url;
        }
        if let Some(thumbnail_url) = self.thumbnail_url {
            video.thumbnail_url = thumbnail_url;
        }
    }
}
