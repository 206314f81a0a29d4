// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! bcrypt password hashing and verification.
//!
//! No password policy is enforced here. The only input refused is one
//! longer than bcrypt's 72-byte limit, which is never silently truncated.

use crate::error::AppError;
use bcrypt::BcryptError;

/// Longest password bcrypt takes without truncation.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes and verifies passwords with a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Salted one-way hash of `password`.
    ///
    /// Only fails if the bcrypt primitive itself errors. An input over
    /// [`MAX_PASSWORD_BYTES`] is `InvalidInput`.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::non_truncating_hash(password, self.cost).map_err(|e| match e {
            BcryptError::Truncation(_) => AppError::InvalidInput(format!(
                "Password longer than {} bytes",
                MAX_PASSWORD_BYTES
            )),
            other => AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", other)),
        })
    }

    /// Check `password` against a stored hash.
    ///
    /// A malformed stored hash or an over-long password counts as a
    /// mismatch; the caller only ever learns yes or no.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match bcrypt::non_truncating_verify(password, stored_hash) {
            Ok(matches) => matches,
            Err(BcryptError::Truncation(_)) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be checked");
                false
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(
        &self,
        password: String,
        stored_hash: String,
    ) -> Result<bool, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Verification task failed: {}", e)))
    }
}
