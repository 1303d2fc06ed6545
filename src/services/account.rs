// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account usecases: sign-in sync and profile management.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{FileUpload, NewUser, UploadAuthorization, UploadPurpose, User, UserUpdate};
use crate::services::identity::IdentityProvider;
use crate::services::session::SessionIssuer;
use crate::services::uploads::UploadBroker;
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: User,
    /// Freshly issued session token
    pub token: String,
    /// Whether this sign-in created the user row
    pub created: bool,
}

/// Profile update request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100), custom(function = "validate_display_name"))]
    pub display_name: Option<String>,
    #[validate(nested)]
    pub profile_picture: Option<FileUpload>,
}

fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank_display_name"));
    }
    Ok(())
}

/// Updated profile plus the upload authorization, if one was requested.
#[derive(Debug, Clone)]
pub struct ProfileUpdateResult {
    pub user: User,
    pub upload: Option<UploadAuthorization>,
}

/// Account usecases over the injected store, identity provider and broker.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityProvider>,
    sessions: SessionIssuer,
    uploads: UploadBroker,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn Store>,
        identity: Arc<dyn IdentityProvider>,
        sessions: SessionIssuer,
        uploads: UploadBroker,
    ) -> Self {
        Self {
            store,
            identity,
            sessions,
            uploads,
        }
    }

    /// Reconcile an externally authenticated identity with a local user and
    /// issue a session token.
    ///
    /// Idempotent per external ID: repeated calls return the same user.
    pub async fn sign_in(&self, external_id: &str) -> Result<SignIn, AppError> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(AppError::BadRequest(
                "externalIdentityId is required".to_string(),
            ));
        }

        let profile = self.identity.resolve_profile(external_id).await?;

        let (user, created) = match self.store.find_user_by_external_id(external_id).await? {
            Some(user) => (user, false),
            None => {
                let email = profile
                    .email()
                    .ok_or_else(|| AppError::MissingEmail(external_id.to_string()))?
                    .to_string();
                let display_name = profile.display_name().ok_or_else(|| {
                    AppError::BadRequest("Unable to derive a display name".to_string())
                })?;

                let inserted = self
                    .store
                    .insert_user_if_absent(NewUser {
                        external_identity_id: external_id.to_string(),
                        email,
                        display_name,
                        avatar_url: profile.avatar_url.clone(),
                    })
                    .await?;
                (inserted.user, inserted.created)
            }
        };

        let token = self
            .sessions
            .issue(&user)
            .map_err(|e| AppError::Internal(e.context("session token creation failed")))?;

        tracing::info!(user_id = %user.id, created, "User signed in");

        Ok(SignIn {
            user,
            token,
            created,
        })
    }

    /// Load the profile of a signed-in user.
    pub async fn get_profile(&self, user_id: &str) -> Result<User, AppError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Update the display name and/or request a profile picture upload.
    ///
    /// The avatar URL is pointed at the new object before the client has
    /// uploaded it.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<ProfileUpdateResult, AppError> {
        update.validate()?;

        let upload = match &update.profile_picture {
            Some(file) => Some(
                self.uploads
                    .authorize_upload(user_id, UploadPurpose::ProfilePicture, file)
                    .await?,
            ),
            None => None,
        };

        let user = self
            .store
            .update_user(
                user_id,
                UserUpdate {
                    display_name: update.display_name.map(|name| name.trim().to_string()),
                    avatar_url: upload.as_ref().map(|u| u.public_url.clone()),
                },
            )
            .await?;

        Ok(ProfileUpdateResult { user, upload })
    }
}
