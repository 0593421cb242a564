// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker round engine.
//!
//! Runs Texas Hold'em rounds for a table of human and bot players: deals the
//! cards, posts the blinds, validates and applies betting actions, advances
//! the streets and settles the pot at showdown.
//!
//! ```
//! # use showdown_core::*;
//! let players = (0..3)
//!     .map(|i| Player::new(PlayerId::new(format!("p{i}")), format!("P{i}"), PlayerKind::Bot, INITIAL_CHIPS))
//!     .collect();
//!
//! let mut table = Table::new(players, TableConfig::default());
//! let state = table.start_round(0).unwrap();
//! assert_eq!(state.turn, Some(0));
//! assert_eq!(state.pot, Chips::new(30));
//!
//! let state = table.submit_action(&PlayerId::new("p0"), Action::Fold).unwrap();
//! assert_eq!(state.turn, Some(1));
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod betting;
pub mod error;
pub mod game_state;
pub mod player;
pub mod poker;
pub mod table;

pub use betting::{Action, BettingRound, StreetStatus};
pub use error::{EngineError, Result};
pub use game_state::{RoundState, Stage};
pub use player::{ActionLabel, Player, PlayerId, PlayerKind, PlayerStatus};
pub use poker::{Card, Chips, Deck, HandCategory, HandValue, PlayerCards, Rank, RoundId, Suit};
pub use table::{GameProgress, HandOutcome, INITIAL_CHIPS, Payoff, Table, TableConfig};
