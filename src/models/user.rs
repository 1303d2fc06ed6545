// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User account stored in the credential store.
///
/// Stored with camelCase field names, like [`crate::models::Video`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Internally generated ID
    pub id: String,
    /// Identity provider user ID (also used as Firestore document ID)
    pub external_identity_id: String,
    /// Email address (unique)
    pub email: String,
    /// Name shown in the UI
    pub display_name: String,
    /// Profile picture URL
    pub avatar_url: Option<String>,
    /// When the account was created
    pub created_at: String,
    /// Last profile change
    pub updated_at: String,
}

/// Fields needed to create a user on first sign-in.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_identity_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Profile changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile returned by the user endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct PublicUser {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// Profile returned by the sign-in and auth-check endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct AuthUserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

impl From<&User> for AuthUserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_user_uses_camel_case_fields() {
        let user = User {
            id: "id_1".to_string(),
            external_identity_id: "ext_1".to_string(),
            email: "a@example.com".to_string(),
            display_name: "Ann".to_string(),
            avatar_url: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };

        let doc = serde_json::to_value(&user).unwrap();
        assert_eq!(doc["externalIdentityId"], "ext_1");
        assert_eq!(doc["displayName"], "Ann");
        assert_eq!(doc["createdAt"], "2026-01-01T00:00:00.000Z");
        assert!(doc.get("display_name").is_none());

        let video_doc = serde_json::to_value(crate::db::video_from_new(crate::models::NewVideo {
            title: "Intro".to_string(),
            description: String::new(),
            duration: 60,
            author_id: "id_1".to_string(),
        }))
        .unwrap();
        assert!(video_doc.get("createdAt").is_some());
    }
}
