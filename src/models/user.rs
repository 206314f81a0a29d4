// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Deserializer, Serialize};

/// User record stored in the document.
///
/// `password` holds the bcrypt hash. This type is never sent to
/// clients; use [`UserResponse`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned id, never 0
    pub id: u64,
    /// Unique across users
    pub email: String,
    /// bcrypt hash of the password
    pub password: String,
    /// Access-token lifetime last requested at login (0 = default)
    #[serde(default)]
    pub expires_in_seconds: u64,
    /// The single live refresh token, if any
    #[serde(default, deserialize_with = "empty_slot_as_none")]
    pub refresh_token: Option<RefreshToken>,
    /// Upgraded through the billing provider
    #[serde(default)]
    pub is_chirpy_red: bool,
}

/// Opaque refresh token plus its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// 64 hex characters
    pub refresh_token: String,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
}

impl RefreshToken {
    /// Whether the token is past its expiry at `now` (Unix seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Older documents store a cleared slot as `{"refresh_token": "", "expires_at": 0}`.
fn empty_slot_as_none<'de, D>(deserializer: D) -> Result<Option<RefreshToken>, D::Error>
where
    D: Deserializer<'de>,
{
    let slot = Option::<RefreshToken>::deserialize(deserializer)?;
    Ok(slot.filter(|t| !t.refresh_token.is_empty()))
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}
