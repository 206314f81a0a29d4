// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod password;
pub mod profanity;
pub mod session;
pub mod tokens;

pub use password::PasswordHasher;
pub use session::{LoginOutcome, SessionService};
pub use tokens::{TokenError, TokenIssuer, VerifiedToken};
