// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared-secret authentication for the billing webhook.

use crate::error::AppError;
use crate::middleware::auth::authorization_credential;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Constant-time comparison of a presented key against the expected one.
pub fn api_key_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Require `Authorization: ApiKey <key>` matching the configured Polka key.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = authorization_credential(request.headers(), "ApiKey").map_err(|e| {
        tracing::warn!("Blocked webhook request without API key");
        e
    })?;

    if !api_key_matches(presented, &state.config.polka_api_key) {
        tracing::warn!("Blocked webhook request with wrong API key");
        return Err(AppError::Unauthenticated);
    }

    Ok(next.run(request).await)
}
