// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirp routes. Reads are public; creating and deleting need a principal.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Chirp, ChirpFilter, SortOrder, MAX_CHIRP_LENGTH};
use crate::routes::validated;
use crate::services::profanity::clean_body;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Public chirp routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chirps", get(list_chirps))
        .route("/api/chirps/{chirp_id}", get(get_chirp))
}

/// Chirp routes behind the auth middleware (applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chirps", post(create_chirp))
        .route("/api/chirps/{chirp_id}", delete(delete_chirp))
}

#[derive(Deserialize)]
struct ListQuery {
    author_id: Option<u64>,
    sort: Option<SortOrder>,
}

#[derive(Deserialize, Validate)]
pub struct CreateChirpRequest {
    #[validate(length(max = MAX_CHIRP_LENGTH))]
    body: String,
}

fn parse_chirp_id(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput("Invalid chirp id".to_string()))
}

/// List chirps, optionally by `author_id`, sorted by `sort=asc|desc`.
async fn list_chirps(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Chirp>>> {
    let Query(params) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let filter = ChirpFilter {
        author_id: params.author_id,
        order: params.sort.unwrap_or_default(),
    };
    let chirps = state.db.list_chirps(filter).await?;

    Ok(Json(chirps))
}

/// Get one chirp.
async fn get_chirp(
    State(state): State<Arc<AppState>>,
    Path(chirp_id): Path<String>,
) -> Result<Json<Chirp>> {
    let id = parse_chirp_id(&chirp_id)?;

    let chirp = state
        .db
        .get_chirp(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chirp {} not found", id)))?;

    Ok(Json(chirp))
}

/// Post a chirp as the authenticated user.
async fn create_chirp(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<CreateChirpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Chirp>)> {
    let req = validated(body)?;

    let chirp = state
        .db
        .create_chirp(&clean_body(&req.body), user.id())
        .await?;

    tracing::info!(chirp_id = chirp.id, user_id = user.id(), "Chirp created");
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// Delete a chirp the caller owns.
async fn delete_chirp(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_chirp_id(&chirp_id)?;

    state
        .db
        .delete_chirp_authored_by(id, user.id())
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Forbidden) {
                tracing::warn!(
                    chirp_id = id,
                    user_id = user.id(),
                    "Delete of foreign chirp refused"
                );
            }
        })?;

    tracing::info!(chirp_id = id, user_id = user.id(), "Chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}
