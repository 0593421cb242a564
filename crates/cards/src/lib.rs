// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use showdown_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let td: Card = "TD".parse().unwrap();
//! assert_eq!(ah.value(), 14);
//! assert_eq!(td.rank(), Rank::Ten);
//! ```
//!
//! and a [Deck] type that deals a fresh shuffled set of 52 cards for each hand:
//!
//! ```
//! # use showdown_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! let c1 = deck.draw().unwrap();
//! let c2 = deck.draw().unwrap();
//! assert_ne!(c1, c2);
//! assert_eq!(deck.count(), Deck::SIZE - 2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, DeckExhausted, ParseCardError, Rank, Suit};
