// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (keyed by external identity ID so first sign-in can use a
//!   create-only write as its uniqueness check)
//! - Videos (keyed by video ID)

use super::{
    apply_user_update, collections, user_from_new, video_from_new, InsertedUser, Store,
};
use crate::error::AppError;
use crate::models::{NewUser, NewVideo, User, UserUpdate, Video, VideoUpdate};
use async_trait::async_trait;
use firestore::errors::FirestoreError;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any token; skip loading real credentials.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Write a full user document.
    async fn set_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.external_identity_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Write a full video document.
    async fn set_video(&self, video: &Video) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::VIDEOS)
            .document_id(&video.id)
            .object(video)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a user by email address.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let user_id = user_id.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("id").eq(user_id.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(external_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_user_if_absent(
        &self,
        new_user: NewUser,
    ) -> Result<InsertedUser, AppError> {
        // Best-effort email check; Firestore has no secondary unique index.
        if let Some(owner) = self.find_user_by_email(&new_user.email).await? {
            if owner.external_identity_id != new_user.external_identity_id {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    new_user.email
                )));
            }
        }

        let user = user_from_new(new_user);

        // Create-only write: fails if the document already exists.
        let inserted: Result<User, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.external_identity_id)
            .object(&user)
            .execute()
            .await;

        match inserted {
            Ok(created) => {
                tracing::info!(user_id = %created.id, "Created user");
                Ok(InsertedUser {
                    user: created,
                    created: true,
                })
            }
            Err(FirestoreError::DataConflictError(_)) => {
                tracing::info!(
                    external_id = %user.external_identity_id,
                    "Concurrent first sign-in, using existing user"
                );
                let existing = self
                    .find_user_by_external_id(&user.external_identity_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Database("User vanished after insert conflict".to_string())
                    })?;
                Ok(InsertedUser {
                    user: existing,
                    created: false,
                })
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User, AppError> {
        // Fetch-modify-write to preserve other fields
        let mut user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        apply_user_update(&mut user, update);
        self.set_user(&user).await?;
        Ok(user)
    }

    // ─── Video Operations ────────────────────────────────────────

    async fn list_videos(&self) -> Result<Vec<Video>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::VIDEOS)
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_video(&self, video_id: &str) -> Result<Option<Video>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VIDEOS)
            .obj()
            .one(video_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_video(&self, new_video: NewVideo) -> Result<Video, AppError> {
        let video = video_from_new(new_video);
        self.set_video(&video).await?;
        Ok(video)
    }

    async fn update_video(
        &self,
        video_id: &str,
        update: VideoUpdate,
    ) -> Result<Video, AppError> {
        let mut video = self
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        update.apply_to(&mut video);
        video.updated_at = crate::time_utils::now_rfc3339();
        self.set_video(&video).await?;
        Ok(video)
    }
}
