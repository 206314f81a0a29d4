// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Polka billing events.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// The only event that changes anything.
pub const USER_UPGRADED: &str = "user.upgraded";

/// Webhook routes. The API-key layer is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/polka/webhooks", post(handle_event))
}

/// Polka webhook event payload.
#[derive(Deserialize, Debug)]
struct WebhookEvent {
    event: String,
    data: WebhookData,
}

#[derive(Deserialize, Debug)]
struct WebhookData {
    user_id: u64,
}

/// Handle incoming webhook events (POST).
async fn handle_event(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<WebhookEvent>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(event) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = event.data.user_id;
    state
        .db
        .modify_user(user_id, |user| user.is_chirpy_red = true)
        .await?;

    tracing::info!(user_id, "User upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}
