// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delegated upload broker.
//!
//! Hands clients a short-lived pre-signed PUT URL so binary payloads go
//! straight to object storage instead of through this server.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{FileUpload, UploadAuthorization, UploadPurpose};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// How long an upload URL stays usable.
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// Object storage capable of issuing scoped write authorizations.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Pre-sign a PUT of exactly `key` with `content_type`, valid for
    /// `expires_in`. Fails with [`AppError::UploadAuthorizationFailed`].
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, AppError>;
}

/// S3 presigner. Presigning is a local computation; S3 is not contacted.
#[derive(Clone)]
pub struct S3Presigner {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Presigner {
    /// Build from the default AWS credential chain.
    pub async fn from_env(region: &str, bucket: &str) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            bucket: bucket.to_string(),
        }
    }

    /// Build with fixed credentials (local development and tests).
    pub fn with_static_credentials(
        region: &str,
        bucket: &str,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Self {
        let credentials =
            Credentials::new(access_key_id, secret_access_key, None, None, "static");

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Presigner {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| AppError::UploadAuthorizationFailed(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Failed to presign S3 upload");
                AppError::UploadAuthorizationFailed(e.to_string())
            })?;

        Ok(request.uri().to_string())
    }
}

/// Issues upload authorizations for namespaced keys.
#[derive(Clone)]
pub struct UploadBroker {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl UploadBroker {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(store: Arc<dyn ObjectStore>, config: &Config) -> Self {
        Self::new(store, &config.s3_public_base_url)
    }

    /// Where an object stored at `key` can be read. Does not contact the store.
    pub fn public_url(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.public_base_url, encoded.join("/"))
    }

    /// Authorize one direct upload of `file` for `owner_id`.
    ///
    /// Issuing does not mean the client will upload; nothing tracks the
    /// authorization afterwards.
    pub async fn authorize_upload(
        &self,
        owner_id: &str,
        purpose: UploadPurpose,
        file: &FileUpload,
    ) -> Result<UploadAuthorization, AppError> {
        file.validate()?;

        let target_key = purpose.target_key(owner_id, &file.file_name);
        let upload_url = self
            .store
            .presign_put(&target_key, &file.file_type, UPLOAD_URL_TTL)
            .await?;
        let public_url = self.public_url(&target_key);

        tracing::info!(
            owner_id,
            purpose = %purpose,
            key = %target_key,
            "Issued upload authorization"
        );

        Ok(UploadAuthorization {
            target_key,
            content_type: file.file_type.clone(),
            expires_at: chrono::Utc::now()
                + chrono::Duration::seconds(UPLOAD_URL_TTL.as_secs() as i64),
            upload_url,
            public_url,
        })
    }
}
