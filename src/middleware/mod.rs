// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (bearer-token and API-key authentication).

pub mod api_key;
pub mod auth;

pub use api_key::require_api_key;
pub use auth::{require_auth, AuthUser};
