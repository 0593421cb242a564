// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker hand evaluator.
//!
//! Evaluates Texas Hold'em hands made of 2 hole cards and up to 5 board cards,
//! returning the hand category, a score that can be compared across hands, and
//! the best five cards:
//!
//! ```
//! # use showdown_eval::*;
//! let cards = ["AS", "KS", "QS", "JS", "TS", "2D", "2C"]
//!     .iter()
//!     .map(|c| c.parse::<Card>().unwrap())
//!     .collect::<Vec<_>>();
//!
//! let v1 = HandValue::eval(&cards);
//! assert_eq!(v1.category(), HandCategory::StraightFlush);
//!
//! let v2 = HandValue::eval(&cards[2..]);
//! assert!(v1 > v2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandCategory, HandValue};

// Reexport cards types.
pub use showdown_cards::{Card, Deck, DeckExhausted, Rank, Suit};
