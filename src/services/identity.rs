// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider adapter.
//!
//! Sole point of contact with Clerk. Translates a Clerk user ID into the
//! canonical [`IdentityProfile`] used by sign-in.

use crate::config::Config;
use crate::error::AppError;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Canonical profile of an externally authenticated user.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityProfile {
    pub external_id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl IdentityProfile {
    /// Non-empty email address, if the provider has one.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// Preferred display name: username, then first name, then the local
    /// part of the email address.
    pub fn display_name(&self) -> Option<String> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        non_empty(&self.username)
            .or_else(|| non_empty(&self.first_name))
            .or_else(|| {
                self.email()
                    .and_then(|e| e.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
    }
}

/// Resolves external identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up a user by identity provider ID.
    ///
    /// Fails with [`AppError::IdentityNotFound`] when the provider has no such
    /// user and [`AppError::IdentityProviderUnavailable`] on transport or
    /// server failures. No retries.
    async fn resolve_profile(&self, external_id: &str) -> Result<IdentityProfile, AppError>;
}

/// Clerk Backend API client.
pub struct ClerkClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl ClerkClient {
    /// Create a client against `base_url` (e.g. `https://api.clerk.com/v1`).
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building Clerk HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.clerk_api_url, &config.clerk_secret_key)
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn resolve_profile(&self, external_id: &str) -> Result<IdentityProfile, AppError> {
        let url = format!("{}/users/{}", self.base_url, urlencoding::encode(external_id));

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::IdentityProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::IdentityNotFound(external_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Clerk user lookup failed");
            return Err(AppError::IdentityProviderUnavailable(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let user: ClerkUser = response.json().await.map_err(|e| {
            AppError::IdentityProviderUnavailable(format!("Invalid Clerk response: {}", e))
        })?;

        Ok(user.into())
    }
}

/// Subset of the Clerk user object.
#[derive(Debug, Deserialize)]
struct ClerkUser {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ClerkEmailAddress>,
}

#[derive(Debug, Deserialize)]
struct ClerkEmailAddress {
    #[serde(default)]
    id: Option<String>,
    email_address: String,
}

impl From<ClerkUser> for IdentityProfile {
    fn from(user: ClerkUser) -> Self {
        let primary = user.primary_email_address_id.as_deref().and_then(|primary| {
            user.email_addresses
                .iter()
                .find(|e| e.id.as_deref() == Some(primary))
        });
        let email = primary
            .or_else(|| user.email_addresses.first())
            .map(|e| e.email_address.clone());

        IdentityProfile {
            external_id: user.id,
            email,
            username: user.username,
            first_name: user.first_name,
            avatar_url: user.image_url.filter(|u| !u.is_empty()),
        }
    }
}
