// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod chirp;
pub mod user;

pub use chirp::{Chirp, ChirpFilter, SortOrder, MAX_CHIRP_LENGTH};
pub use user::{RefreshToken, User, UserResponse};
