// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: login, refresh, revoke.

use crate::error::Result;
use crate::middleware::auth::bearer_token;
use crate::routes::validated;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    email: String,
    password: String,
    /// Requested access-token lifetime; out-of-range values, including
    /// zero and negatives, mean one hour.
    #[serde(default)]
    expires_in_seconds: Option<i64>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// Exchange email and password for an access token and a refresh token.
async fn login(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let req = validated(body)?;
    let requested_ttl = req
        .expires_in_seconds
        .and_then(|secs| u64::try_from(secs).ok());

    let outcome = state
        .sessions
        .login(&req.email, &req.password, requested_ttl)
        .await?;

    Ok(Json(LoginResponse {
        id: outcome.user.id,
        email: outcome.user.email,
        is_chirpy_red: outcome.user.is_chirpy_red,
        token: outcome.access_token.token,
        refresh_token: outcome.refresh_token.refresh_token,
    }))
}

/// `Authorization: Bearer <refresh token>` → new access token.
async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>> {
    let refresh_token = bearer_token(&headers)?;
    let access = state.sessions.refresh(refresh_token).await?;

    Ok(Json(RefreshResponse {
        token: access.token,
    }))
}

/// `Authorization: Bearer <refresh token>` → token no longer usable.
async fn revoke(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<StatusCode> {
    let refresh_token = bearer_token(&headers)?;
    state.sessions.revoke(refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}
