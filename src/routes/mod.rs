// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhook;

use crate::error::{AppError, Result};
use crate::middleware::{require_api_key, require_auth};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use validator::Validate;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Unwrap a JSON body and run its field validators.
pub(crate) fn validated<T: Validate>(
    body: std::result::Result<Json<T>, JsonRejection>,
) -> Result<T> {
    let Json(body) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    Ok(body)
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/healthz", get(health_check))
        .merge(users::routes())
        .merge(auth::routes())
        .merge(chirps::routes());

    // Protected routes (bearer access token required)
    let protected_routes = chirps::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Billing provider webhook (API key required)
    let webhook_routes = webhook::routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(webhook_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
