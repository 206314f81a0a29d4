// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: registration, login, refresh, revoke, account update.
//!
//! A user holds at most one refresh token. Logging in again replaces it.
//! Refresh tokens are not rotated on use: the same value keeps minting
//! access tokens until it expires or is revoked.

use crate::db::JsonDb;
use crate::error::AppError;
use crate::models::{RefreshToken, User};
use crate::services::password::PasswordHasher;
use crate::services::tokens::{clamp_ttl, AccessToken, TokenIssuer};

/// Everything a successful login hands back.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

/// Orchestrates credentials, tokens and the store.
#[derive(Clone)]
pub struct SessionService {
    db: JsonDb,
    tokens: TokenIssuer,
    passwords: PasswordHasher,
}

impl SessionService {
    pub fn new(db: JsonDb, tokens: TokenIssuer, passwords: PasswordHasher) -> Self {
        Self {
            db,
            tokens,
            passwords,
        }
    }

    /// Create an account. Fails `DuplicateEmail` if the email is taken.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let hash = self.passwords.hash_blocking(password.to_string()).await?;
        let user = self.db.create_user(email, &hash).await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and start a session.
    ///
    /// Unknown email and wrong password both surface as
    /// `InvalidCredentials`. On success the user's refresh-token slot and
    /// TTL preference are overwritten in one write, and only if the
    /// password hash is still the one that was verified.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl_secs: Option<u64>,
    ) -> Result<LoginOutcome, AppError> {
        let Some(user) = self.db.find_user_by_email(email).await? else {
            tracing::debug!("Login attempt for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let matches = self
            .passwords
            .verify_blocking(password.to_string(), user.password.clone())
            .await?;
        if !matches {
            tracing::debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let ttl = clamp_ttl(requested_ttl_secs.unwrap_or(0));
        let access_token = self.tokens.issue_access_token(user.id, ttl)?;
        let refresh_token = self.tokens.issue_refresh_token()?;

        // The hash just checked must still be the stored one.
        let slot = refresh_token.clone();
        let checked_hash = user.password;
        let user = self
            .db
            .try_modify_user(user.id, move |u| {
                if u.password != checked_hash {
                    return Err(AppError::InvalidCredentials);
                }
                u.expires_in_seconds = ttl;
                u.refresh_token = Some(slot);
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::InvalidCredentials,
                other => other,
            })?;

        tracing::info!(user_id = user.id, ttl_secs = ttl, "User logged in");

        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The TTL is the one recorded at login, never caller-supplied.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AppError> {
        let user = self
            .db
            .find_user_by_refresh_token(refresh_token)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        let slot = user.refresh_token.as_ref().ok_or(AppError::Unauthenticated)?;
        if slot.is_expired_at(chrono::Utc::now().timestamp()) {
            tracing::debug!(user_id = user.id, "Refresh with expired token");
            return Err(AppError::Expired);
        }

        let access_token = self
            .tokens
            .issue_access_token(user.id, user.expires_in_seconds)?;

        tracing::debug!(user_id = user.id, "Access token refreshed");
        Ok(access_token)
    }

    /// Invalidate a refresh token. Succeeds whether or not it was live.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        let cleared = self.db.clear_refresh_token_by_value(refresh_token).await?;
        tracing::debug!(cleared, "Refresh token revoked");
        Ok(())
    }

    /// Change email and password for the holder of `access_token`.
    pub async fn update_account(
        &self,
        access_token: &str,
        new_email: &str,
        new_password: &str,
    ) -> Result<User, AppError> {
        let verified = self
            .tokens
            .verify_access_token(access_token)
            .map_err(|e| {
                tracing::debug!(reason = %e, "Account update with rejected token");
                AppError::Unauthenticated
            })?;

        let hash = self
            .passwords
            .hash_blocking(new_password.to_string())
            .await?;

        let email = new_email.to_string();
        let user = self
            .db
            .modify_user(verified.user_id, move |u| {
                u.email = email;
                u.password = hash;
            })
            .await
            .map_err(|e| match e {
                // Token outlived its account.
                AppError::NotFound(_) => AppError::Unauthenticated,
                other => other,
            })?;

        tracing::info!(user_id = user.id, "Account updated");
        Ok(user)
    }
}
