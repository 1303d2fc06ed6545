// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use guild_api::config::Config;
use guild_api::db::{FirestoreDb, MemoryStore};
use guild_api::error::AppError;
use guild_api::routes::create_router;
use guild_api::services::{IdentityProfile, IdentityProvider, ObjectStore, S3Presigner};
use guild_api::AppState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Identity provider backed by a fixed map of profiles.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeIdentityProvider {
    profiles: HashMap<String, IdentityProfile>,
    unavailable: bool,
}

#[allow(dead_code)]
impl FakeIdentityProvider {
    pub fn with_profile(mut self, profile: IdentityProfile) -> Self {
        self.profiles.insert(profile.external_id.clone(), profile);
        self
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn resolve_profile(&self, external_id: &str) -> Result<IdentityProfile, AppError> {
        if self.unavailable {
            return Err(AppError::IdentityProviderUnavailable(
                "connection refused".to_string(),
            ));
        }
        self.profiles
            .get(external_id)
            .cloned()
            .ok_or_else(|| AppError::IdentityNotFound(external_id.to_string()))
    }
}

/// Object store that refuses every authorization.
#[allow(dead_code)]
pub struct FailingObjectStore;

#[async_trait]
impl ObjectStore for FailingObjectStore {
    async fn presign_put(
        &self,
        _key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> Result<String, AppError> {
        Err(AppError::UploadAuthorizationFailed(
            "credentials expired".to_string(),
        ))
    }
}

/// Profile with an email and optional username.
#[allow(dead_code)]
pub fn profile(external_id: &str, email: Option<&str>, username: Option<&str>) -> IdentityProfile {
    IdentityProfile {
        external_id: external_id.to_string(),
        email: email.map(str::to_string),
        username: username.map(str::to_string),
        first_name: None,
        avatar_url: None,
    }
}

/// Presigner with static credentials; presigning never touches the network.
#[allow(dead_code)]
pub fn test_presigner(config: &Config) -> Arc<dyn ObjectStore> {
    Arc::new(S3Presigner::with_static_credentials(
        &config.aws_region,
        &config.s3_bucket_name,
        "AKIDEXAMPLE",
        "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
    ))
}

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(identity: FakeIdentityProvider) -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let object_store = test_presigner(&config);
    create_test_app_with(config, identity, object_store)
}

/// Create a test app with explicit collaborators.
#[allow(dead_code)]
pub fn create_test_app_with(
    config: Config,
    identity: FakeIdentityProvider,
    object_store: Arc<dyn ObjectStore>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(identity),
        object_store,
    ));

    (create_router(state.clone()), state)
}

/// All `Set-Cookie` header values of a response.
#[allow(dead_code)]
pub fn set_cookie_headers<B>(response: &Response<B>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// `name=value` of the session cookie set by a response.
#[allow(dead_code)]
pub fn session_cookie_pair<B>(response: &Response<B>) -> String {
    let headers = set_cookie_headers(response);
    let cookie = headers
        .iter()
        .find(|value| value.starts_with("token="))
        .unwrap_or_else(|| panic!("missing session Set-Cookie header: {headers:?}"));
    cookie.split(';').next().unwrap().to_string()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a JSON request, optionally carrying a cookie header.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a body-less request, optionally carrying a cookie header.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Sign in through the API and return the `token=...` cookie pair.
#[allow(dead_code)]
pub async fn sign_in(app: &axum::Router, external_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/signin",
            None,
            serde_json::json!({ "externalIdentityId": external_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200, "sign-in failed for {external_id}");
    session_cookie_pair(&response)
}
