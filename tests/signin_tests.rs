// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in sync and auth check tests.

use axum::http::StatusCode;
use guild_api::services::IdentityProfile;
use tower::ServiceExt;

mod common;
use common::{
    body_json, create_test_app, empty_request, json_request, profile, session_cookie_pair,
    sign_in, FakeIdentityProvider,
};

fn signin_request(external_id: &str) -> axum::http::Request<axum::body::Body> {
    json_request(
        "POST",
        "/api/signin",
        None,
        serde_json::json!({ "externalIdentityId": external_id }),
    )
}

#[tokio::test]
async fn test_first_signin_creates_user_from_first_name() {
    let identity = FakeIdentityProvider::default().with_profile(IdentityProfile {
        external_id: "ext_1".to_string(),
        email: Some("a@example.com".to_string()),
        username: None,
        first_name: Some("Ann".to_string()),
        avatar_url: None,
    });
    let (app, state) = create_test_app(identity);

    let response = app.oneshot(signin_request("ext_1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie_pair(&response);
    assert!(cookie.len() > "token=".len());

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["redirect"], "/");
    assert_eq!(body["user"]["name"], "Ann");
    assert_eq!(body["user"]["email"], "a@example.com");

    let stored = state
        .store
        .find_user_by_external_id("ext_1")
        .await
        .unwrap()
        .expect("user should be created");
    assert_eq!(stored.display_name, "Ann");
    assert_eq!(stored.email, "a@example.com");
    assert_eq!(body["user"]["id"], stored.id.as_str());
}

#[tokio::test]
async fn test_signin_is_idempotent() {
    let identity =
        FakeIdentityProvider::default().with_profile(profile("u_1", Some("a@x.io"), Some("ann")));
    let (app, _) = create_test_app(identity);

    let first = body_json(app.clone().oneshot(signin_request("u_1")).await.unwrap()).await;
    let second = body_json(app.oneshot(signin_request("u_1")).await.unwrap()).await;

    assert_eq!(first["user"]["id"], second["user"]["id"]);
    assert_eq!(first["user"], second["user"]);
}

#[tokio::test]
async fn test_concurrent_first_signins_create_one_user() {
    let identity =
        FakeIdentityProvider::default().with_profile(profile("u_1", Some("a@x.io"), Some("ann")));
    let (app, _) = create_test_app(identity);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let response = app.oneshot(signin_request("u_1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            body_json(response).await["user"]["id"].clone()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_signin_without_email_is_bad_request() {
    let identity =
        FakeIdentityProvider::default().with_profile(profile("u_2", None, Some("nomail")));
    let (app, state) = create_test_app(identity);

    let response = app.oneshot(signin_request("u_2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state
        .store
        .find_user_by_external_id("u_2")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_signin_unknown_identity_is_not_found() {
    let (app, _) = create_test_app(FakeIdentityProvider::default());

    let response = app.oneshot(signin_request("ghost")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .is_none());
}

#[tokio::test]
async fn test_signin_provider_outage_is_server_error() {
    let (app, _) = create_test_app(FakeIdentityProvider::unavailable());

    let response = app.oneshot(signin_request("u_1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "An unexpected error occurred");
}

#[tokio::test]
async fn test_signin_requires_external_id() {
    let (app, _) = create_test_app(FakeIdentityProvider::default());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/signin",
            None,
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_check_auth_with_session() {
    let identity =
        FakeIdentityProvider::default().with_profile(profile("u_1", Some("a@x.io"), Some("ann")));
    let (app, _) = create_test_app(identity);
    let cookie = sign_in(&app, "u_1").await;

    let response = app
        .oneshot(empty_request("GET", "/api/auth/check", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["name"], "ann");
    assert!(body["redirect"].is_null());
}

#[tokio::test]
async fn test_check_auth_without_session() {
    let (app, _) = create_test_app(FakeIdentityProvider::default());

    for cookie in [None, Some("token=garbage")] {
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/auth/check", cookie))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["authenticated"], false);
        assert!(body["user"].is_null());
        assert_eq!(body["redirect"], "/signin");
    }
}

#[tokio::test]
async fn test_check_auth_with_orphaned_session() {
    let (app, state) = create_test_app(FakeIdentityProvider::default());
    let orphan = guild_api::models::User {
        id: "deleted-user".to_string(),
        external_identity_id: "ext_gone".to_string(),
        email: "gone@x.io".to_string(),
        display_name: "gone".to_string(),
        avatar_url: None,
        created_at: "2026-01-01T00:00:00.000Z".to_string(),
        updated_at: "2026-01-01T00:00:00.000Z".to_string(),
    };
    let token = state.sessions.issue(&orphan).unwrap();

    let response = app
        .oneshot(empty_request(
            "GET",
            "/api/auth/check",
            Some(&format!("token={token}")),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["redirect"], "/signin");
}
