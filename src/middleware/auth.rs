// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token authentication middleware and ownership checks.

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user resolved from an access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    pub fn id(&self) -> u64 {
        self.user.id
    }
}

/// Extract `<credential>` from an `Authorization: <scheme> <credential>` header.
pub fn authorization_credential<'a>(
    headers: &'a HeaderMap,
    scheme: &str,
) -> Result<&'a str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MalformedHeader)?;

    value
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(str::trim)
        .ok_or(AppError::MalformedHeader)
}

/// Shorthand for the `Bearer` scheme.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    authorization_credential(headers, "Bearer")
}

/// Resolve the principal behind an `Authorization: Bearer` header.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers)?;

    let verified = state.tokens.verify_access_token(token).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected access token");
        AppError::Unauthenticated
    })?;

    // A token whose user has since disappeared is just an invalid token.
    let user = state
        .db
        .find_user_by_id(verified.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = verified.user_id, "Access token for unknown user");
            AppError::Unauthenticated
        })?;

    Ok(AuthUser { user })
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
