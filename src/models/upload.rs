// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delegated upload types: file metadata from the client and the
//! authorization handed back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// File metadata supplied by the client for a direct upload.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct FileUpload {
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_file_name")
    )]
    pub file_name: String,
    /// MIME type the client will send
    #[validate(length(min = 1, max = 255))]
    pub file_type: String,
}

/// Reject names that would leave the owner's key namespace.
fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    let escapes = name.contains('/')
        || name.contains('\\')
        || name == "."
        || name == ".."
        || name.chars().any(char::is_control);
    if escapes {
        return Err(ValidationError::new("file_name")
            .with_message("file name must be a single path segment".into()));
    }
    Ok(())
}

/// What an uploaded object is for. Decides the key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPurpose {
    Video,
    Thumbnail,
    ProfilePicture,
}

impl UploadPurpose {
    /// Storage key for `file_name` owned by `owner_id`.
    ///
    /// Profile pictures live under `profile-pictures/<user>/`, lesson assets
    /// under `lessons/<video>/<video|thumbnail>/`.
    pub fn target_key(self, owner_id: &str, file_name: &str) -> String {
        match self {
            UploadPurpose::ProfilePicture => {
                format!("profile-pictures/{}/{}", owner_id, file_name)
            }
            UploadPurpose::Video | UploadPurpose::Thumbnail => {
                format!("lessons/{}/{}/{}", owner_id, self, file_name)
            }
        }
    }
}

impl fmt::Display for UploadPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadPurpose::Video => "video",
            UploadPurpose::Thumbnail => "thumbnail",
            UploadPurpose::ProfilePicture => "profile-picture",
        };
        f.write_str(name)
    }
}

/// A one-time, time-limited permission to write one object.
#[derive(Debug, Clone)]
pub struct UploadAuthorization {
    pub target_key: String,
    pub content_type: String,
    pub expires_at: DateTime<Utc>,
    /// Pre-signed PUT URL the client uploads to
    pub upload_url: String,
    /// Where the object will be readable once uploaded
    pub public_url: String,
}
