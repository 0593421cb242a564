// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Automated player strategies.
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use showdown_core::{Action, PlayerCards, RoundState};

/// A Poker bot strategy.
pub trait Strategy: Send + 'static {
    /// Returns an action for the player at this seat given the round state.
    fn execute(&mut self, state: &RoundState, seat: usize) -> Action;
}

impl Strategy for Box<dyn Strategy> {
    fn execute(&mut self, state: &RoundState, seat: usize) -> Action {
        self.as_mut().execute(state, seat)
    }
}

/// Checks when possible, calls otherwise.
#[derive(Debug, Clone, Default)]
pub struct PassiveStrategy;

impl Strategy for PassiveStrategy {
    fn execute(&mut self, state: &RoundState, seat: usize) -> Action {
        let actions = state.legal_actions(seat);
        if actions.contains(&Action::Check) {
            Action::Check
        } else if actions.contains(&Action::Call) {
            Action::Call
        } else if actions.contains(&Action::AllIn) {
            Action::AllIn
        } else {
            Action::Fold
        }
    }
}

/// A loose bot that plays high cards and pairs, with some randomness.
#[derive(Debug)]
pub struct BaselineStrategy {
    rng: StdRng,
}

impl Default for BaselineStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BaselineStrategy {
    /// Creates a strategy with OS randomness.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a strategy with user initialized randomness.
    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// A first hole card above ten or a pocket pair.
    fn is_high_hand(hand: &PlayerCards) -> bool {
        match hand.cards() {
            Some([c1, c2]) => c1.value() > 10 || c1.rank() == c2.rank(),
            None => false,
        }
    }
}

impl Strategy for BaselineStrategy {
    fn execute(&mut self, state: &RoundState, seat: usize) -> Action {
        let Some(player) = state.players.get(seat) else {
            return Action::Fold;
        };

        let owed = state.street_high - player.bet;
        let high_hand = Self::is_high_hand(&player.hand);
        let p = self.rng.random::<f64>();

        let action = if owed.is_zero() {
            if p > 0.2 {
                Action::Check
            } else {
                Action::Raise(state.min_raise_to())
            }
        } else if owed > player.chips {
            if high_hand || p > 0.8 {
                Action::AllIn
            } else {
                Action::Fold
            }
        } else if p > 0.9 {
            Action::Raise(state.min_raise_to())
        } else if high_hand || p > 0.4 {
            Action::Call
        } else {
            Action::Fold
        };

        debug!(
            "{} owes {owed} high hand {high_hand} p {p:.2} -> {action}",
            player.name
        );

        action
    }
}
