// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video lesson routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Video;
use crate::routes::extract::JsonBody;
use crate::services::{VideoInput, VideoMutation};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/videos", get(list_videos).post(create_video))
        .route("/api/videos/{id}", get(get_video).put(update_video))
}

/// Response for video create/update.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct VideoMutationResponse {
    pub success: bool,
    pub video: Video,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_signed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_signed_url: Option<String>,
}

impl From<VideoMutation> for VideoMutationResponse {
    fn from(mutation: VideoMutation) -> Self {
        Self {
            success: true,
            video: mutation.video,
            video_signed_url: mutation.video_upload.map(|u| u.upload_url),
            thumbnail_signed_url: mutation.thumbnail_upload.map(|u| u.upload_url),
        }
    }
}

/// All videos, newest first.
async fn list_videos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Video>>> {
    Ok(Json(state.videos.list().await?))
}

/// A missing video is `null`, not 404.
async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Video>>> {
    Ok(Json(state.videos.get(&id).await?))
}

async fn create_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<VideoInput>,
) -> Result<(StatusCode, Json<VideoMutationResponse>)> {
    let mutation = state.videos.create(&user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(mutation.into())))
}

async fn update_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<VideoInput>,
) -> Result<Json<VideoMutationResponse>> {
    let mutation = state.videos.update(&user.user_id, &id, input).await?;
    Ok(Json(mutation.into()))
}
