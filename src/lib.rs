// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirpy: a small social-posting service.
//!
//! Users register, log in for short-lived access tokens plus a long-lived
//! refresh token, and post short "chirps". Everything is kept in a single
//! JSON document on disk.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::JsonDb;
use services::{PasswordHasher, SessionService, TokenIssuer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: JsonDb,
    pub tokens: TokenIssuer,
    pub sessions: SessionService,
}

impl AppState {
    /// Wire services from configuration and an opened store.
    pub fn new(config: Config, db: JsonDb) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_signing_key);
        let passwords = PasswordHasher::new(config.bcrypt_cost);
        let sessions = SessionService::new(db.clone(), tokens.clone(), passwords);

        Self {
            config,
            db,
            tokens,
            sessions,
        }
    }
}
