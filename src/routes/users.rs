// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: registration and credential updates.

use crate::error::Result;
use crate::middleware::auth::bearer_token;
use crate::models::UserResponse;
use crate::routes::validated;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", post(create_user).put(update_user))
}

/// Body for both registration and update.
#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email)]
    email: String,
    password: String,
}

/// Register a new user.
async fn create_user(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let req = validated(body)?;
    let user = state.sessions.register(&req.email, &req.password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Change the caller's email and password.
async fn update_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let token = bearer_token(&headers)?;
    let req = validated(body)?;

    let user = state
        .sessions
        .update_account(token, &req.email, &req.password)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}
