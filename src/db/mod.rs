// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (single JSON document on disk).

pub mod json_file;

pub use json_file::{Document, JsonDb};
