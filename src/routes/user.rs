// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes for the signed-in user.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::PublicUser;
use crate::routes::extract::JsonBody;
use crate::services::ProfileUpdate;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/user", get(get_user).put(update_user))
}

/// Get current user profile.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PublicUser>> {
    let profile = state.accounts.get_profile(&user.user_id).await?;
    Ok(Json(PublicUser::from(&profile)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct UpdateUserResponse {
    pub success: bool,
    pub user: PublicUser,
    /// Pre-signed PUT URL for the new profile picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,
    /// Where the profile picture will be readable after upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

/// Update the display name and/or start a profile picture upload.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> Result<Json<UpdateUserResponse>> {
    let result = state.accounts.update_profile(&user.user_id, update).await?;

    let (signed_url, profile_picture_url) = match result.upload {
        Some(upload) => (Some(upload.upload_url), Some(upload.public_url)),
        None => (None, None),
    };

    Ok(Json(UpdateUserResponse {
        success: true,
        user: PublicUser::from(&result.user),
        signed_url,
        profile_picture_url,
    }))
}
