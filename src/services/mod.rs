// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod identity;
pub mod session;
pub mod uploads;
pub mod video;

pub use account::{AccountService, ProfileUpdate, ProfileUpdateResult, SignIn};
pub use identity::{ClerkClient, IdentityProfile, IdentityProvider};
pub use session::{SessionClaims, SessionIssuer, SESSION_COOKIE_NAME, SESSION_TTL_SECS};
pub use uploads::{ObjectStore, S3Presigner, UploadBroker, UPLOAD_URL_TTL};
pub use video::{VideoInput, VideoMutation, VideoService};
