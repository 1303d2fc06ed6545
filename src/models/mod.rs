// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod upload;
pub mod user;
pub mod video;

pub use upload::{FileUpload, UploadAuthorization, UploadPurpose};
pub use user::{AuthUserView, NewUser, PublicUser, User, UserUpdate};
pub use video::{NewVideo, Video, VideoUpdate};
