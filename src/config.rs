// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and handed to the components that
//! need them; nothing else reads the environment afterwards.

use std::env;
use std::path::PathBuf;

/// Default location of the JSON document store.
pub const DEFAULT_DATABASE_PATH: &str = "database.json";

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Lowest work factor bcrypt accepts; used by tests.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Path of the JSON document holding users and chirps
    pub database_path: PathBuf,
    /// Delete the document at startup (local development only)
    pub reset_database: bool,
    /// bcrypt work factor used for new password hashes
    pub bcrypt_cost: u32,

    // --- Secrets ---
    /// HMAC key for access tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Shared key the billing provider presents on webhook calls
    pub polka_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => {
                let cost: u32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("BCRYPT_COST", raw.clone()))?;
                if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                    return Err(ConfigError::Invalid("BCRYPT_COST", raw));
                }
                cost
            }
            Err(_) => DEFAULT_BCRYPT_COST,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH)),
            reset_database: env::var("RESET_DATABASE")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            bcrypt_cost,

            jwt_signing_key: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            polka_api_key: env::var("POLKA_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("POLKA_API_KEY"))?,
        })
    }

    /// Fixed configuration for tests, rooted at the given document path.
    pub fn test_default(database_path: impl Into<PathBuf>) -> Self {
        Self {
            port: 8080,
            database_path: database_path.into(),
            reset_database: false,
            bcrypt_cost: MIN_BCRYPT_COST,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            polka_api_key: "test_polka_key".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
