// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker table.
//!
//! Runs a table in a tokio task that owns the round engine: human actions go
//! through a [TableHandle], bots act after a thinking delay, and observers get
//! a [TableSnapshot] after every change.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod commentator;
mod table;

pub use commentator::{CannedCommentator, Commentator, OfflineCommentator, Situation};
pub use table::{Config, Seat, TableHandle, TableSnapshot, TableStatus};

// Reexport crates used in the public API.
pub use showdown_bot as bot;
pub use showdown_core as core;
