// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stateless session credentials (HS256 JWT).

use crate::error::AppError;
use crate::models::User;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "token";

/// Session lifetime: 7 days.
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure. Deliberately minimal.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Internal user ID
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Issues and verifies session tokens with a single shared secret.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionIssuer {
    pub fn new(signing_key: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
        }
    }

    /// Create a session token for `user`, valid for [`SESSION_TTL_SECS`].
    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        let claims = SessionClaims {
            user_id: user.id.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };

        Ok(encode(
            &Header::new(SESSION_ALGORITHM),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Check signature, algorithm and expiry.
    ///
    /// Revocation is not checked; a token stays valid until it expires.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        validation.algorithms = vec![SESSION_ALGORITHM];
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AppError::InvalidToken
            })
    }
}
