// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker bots.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod strategy;
pub use strategy::{BaselineStrategy, PassiveStrategy, Strategy};

/// Bot player names.
pub static NICKNAMES: &[&str] = &[
    "Alpha",
    "DeepBlue",
    "Gemini",
    "Watson",
    "DeepThought",
    "Skynet",
    "Jarvis",
];

/// Returns the nickname for the bot with the given index.
pub fn nickname(idx: usize) -> &'static str {
    NICKNAMES[idx % NICKNAMES.len()]
}
