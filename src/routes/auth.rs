// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, logout and session check routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{clear_session_cookie, session_cookie};
use crate::models::AuthUserView;
use crate::routes::extract::JsonBody;
use crate::services::session::SESSION_COOKIE_NAME;
use crate::AppState;

const HOME_PATH: &str = "/";
const SIGNIN_PATH: &str = "/signin";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/signin", post(signin))
        .route("/api/logout", post(logout))
        .route("/api/auth/check", get(check_auth))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    external_identity_id: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct SignInResponse {
    pub success: bool,
    pub user: AuthUserView,
    pub redirect: String,
}

/// Sync the identity provider user into the local store and start a session.
async fn signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    JsonBody(request): JsonBody<SignInRequest>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let signed_in = state.accounts.sign_in(&request.external_identity_id).await?;

    let cookie = session_cookie(signed_in.token, state.config.secure_cookies());

    Ok((
        jar.add(cookie),
        Json(SignInResponse {
            success: true,
            user: AuthUserView::from(&signed_in.user),
            redirect: HOME_PATH.to_string(),
        }),
    ))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct LogoutResponse {
    pub success: bool,
    pub redirect: String,
}

/// Clear the session cookie. Issued tokens stay valid until they expire.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.add(clear_session_cookie(state.config.secure_cookies())),
        Json(LogoutResponse {
            success: true,
            redirect: SIGNIN_PATH.to_string(),
        }),
    )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct AuthCheckResponse {
    pub authenticated: bool,
    pub user: Option<AuthUserView>,
    pub redirect: Option<String>,
}

impl AuthCheckResponse {
    fn signed_out() -> Self {
        Self {
            authenticated: false,
            user: None,
            redirect: Some(SIGNIN_PATH.to_string()),
        }
    }
}

/// Report whether the request carries a usable session. Never fails.
async fn check_auth(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<AuthCheckResponse> {
    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        return Json(AuthCheckResponse::signed_out());
    };

    let Ok(claims) = state.sessions.verify(cookie.value()) else {
        return Json(AuthCheckResponse::signed_out());
    };

    match state.store.get_user(&claims.user_id).await {
        Ok(Some(user)) => Json(AuthCheckResponse {
            authenticated: true,
            user: Some(AuthUserView::from(&user)),
            redirect: None,
        }),
        Ok(None) => {
            tracing::info!(user_id = %claims.user_id, "Session refers to a missing user");
            Json(AuthCheckResponse::signed_out())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load user during auth check");
            Json(AuthCheckResponse::signed_out())
        }
    }
}
