// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirp (short post) model.

use serde::{Deserialize, Serialize};

/// Maximum chirp length in characters.
pub const MAX_CHIRP_LENGTH: u64 = 140;

/// A stored chirp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub body: String,
    /// Owning user; not checked against the user map by the store
    pub author_id: u64,
}

/// Ordering for chirp listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Listing filter: optional author plus order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChirpFilter {
    pub author_id: Option<u64>,
    pub order: SortOrder,
}
