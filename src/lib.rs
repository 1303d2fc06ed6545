// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guild API: accounts, sessions and video lessons
//!
//! This crate provides the backend API that syncs users from an external
//! identity provider, keeps them signed in with cookie sessions, and hands out
//! pre-signed upload URLs for profile pictures and lesson media.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use services::{
    AccountService, IdentityProvider, ObjectStore, SessionIssuer, UploadBroker, VideoService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub sessions: SessionIssuer,
    pub accounts: AccountService,
    pub videos: VideoService,
}

impl AppState {
    /// Wire services over the given store and external collaborators.
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        identity: Arc<dyn IdentityProvider>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        let sessions = SessionIssuer::new(&config.jwt_signing_key);
        let uploads = UploadBroker::from_config(object_store, &config);

        Self {
            accounts: AccountService::new(
                store.clone(),
                identity,
                sessions.clone(),
                uploads.clone(),
            ),
            videos: VideoService::new(store.clone(), uploads),
            sessions,
            store,
            config,
        }
    }
}
