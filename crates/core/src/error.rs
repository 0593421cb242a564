// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Engine errors.
use thiserror::Error;

use showdown_eval::Deck;

use crate::player::PlayerId;

/// Errors returned by the round engine.
///
/// A failed action leaves the round state unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The action is not legal for the current turn.
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    /// No player with this id is seated.
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// Tried to draw from an empty deck.
    #[error("Deck exhausted after {} cards", Deck::SIZE)]
    DeckExhausted(#[from] showdown_eval::DeckExhausted),
    /// There is no round being played.
    #[error("No round in progress")]
    NoRoundInProgress,
    /// A round is being played.
    #[error("Round in progress")]
    RoundInProgress,
    /// Fewer than two players have chips.
    #[error("Fewer than two players with chips")]
    NotEnoughPlayers,
}

/// Engine result type.
pub type Result<T> = std::result::Result<T, EngineError>;
