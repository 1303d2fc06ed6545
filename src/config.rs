// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Secrets are read once at
//! startup and kept in memory.

use std::env;
use std::fmt;
use std::str::FromStr;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_CLERK_API_URL: &str = "https://api.clerk.com/v1";
const DEFAULT_AWS_REGION: &str = "ap-northeast-1";
const DEFAULT_PORT: u16 = 8080;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(ConfigError::Invalid {
                name: "APP_ENV",
                reason: format!(
                    "must be one of development, production, test; got {:?}",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        };
        f.write_str(name)
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Deployment environment; decides the `Secure` cookie attribute
    pub environment: Environment,
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Base URL of the Clerk Backend API
    pub clerk_api_url: String,
    /// AWS region of the upload bucket
    pub aws_region: String,
    /// Bucket receiving direct uploads
    pub s3_bucket_name: String,
    /// Public read URL prefix for objects in the bucket
    pub s3_public_base_url: String,
    /// GCP project for Firestore; `None` selects the in-memory store
    pub gcp_project_id: Option<String>,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Clerk Backend API secret key
    pub clerk_secret_key: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        let aws_region = DEFAULT_AWS_REGION.to_string();
        let s3_bucket_name = "test-bucket".to_string();
        Self {
            environment: Environment::Test,
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            clerk_api_url: DEFAULT_CLERK_API_URL.to_string(),
            s3_public_base_url: default_public_base_url(&s3_bucket_name, &aws_region),
            aws_region,
            s3_bucket_name,
            gcp_project_id: None,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            clerk_secret_key: "sk_test_secret".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment = env::var("APP_ENV")
            .map(|v| v.parse())
            .unwrap_or(Ok(Environment::Development))?;

        let aws_region = env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_AWS_REGION.to_string());
        let s3_bucket_name = required("S3_BUCKET_NAME")?;
        let s3_public_base_url = env::var("S3_PUBLIC_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| default_public_base_url(&s3_bucket_name, &aws_region));

        Ok(Self {
            environment,
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            clerk_api_url: env::var("CLERK_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_CLERK_API_URL.to_string()),
            aws_region,
            s3_bucket_name,
            s3_public_base_url,
            gcp_project_id: env::var("GCP_PROJECT_ID")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            jwt_signing_key: required("JWT_SECRET")?.into_bytes(),
            clerk_secret_key: required("CLERK_SECRET_KEY")?,
        })
    }

    /// Whether session cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Read a required, trimmed, non-empty environment variable.
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn default_public_base_url(bucket: &str, region: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com", bucket, region)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
