// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Round state snapshots.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    betting::Action,
    player::{Player, PlayerId},
    poker::{Card, Chips, PlayerCards, RoundId},
};

/// The round stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Hole cards dealt.
    Preflop,
    /// Three board cards dealt.
    Flop,
    /// Fourth board card dealt.
    Turn,
    /// Fifth board card dealt.
    River,
    /// The round has been settled.
    Showdown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Stage::Preflop => "Preflop",
            Stage::Flop => "Flop",
            Stage::Turn => "Turn",
            Stage::River => "River",
            Stage::Showdown => "Showdown",
        };

        write!(f, "{stage}")
    }
}

/// A read only snapshot of the round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    /// The round id.
    pub round_id: RoundId,
    /// The round stage.
    pub stage: Stage,
    /// The chips committed by all players in this round.
    pub pot: Chips,
    /// The highest bet in the current street.
    pub street_high: Chips,
    /// The minimum raise size.
    pub min_raise: Chips,
    /// The dealer seat.
    pub dealer: usize,
    /// The seat on turn, none when no action is expected.
    pub turn: Option<usize>,
    /// The community cards.
    pub board: Vec<Card>,
    /// The players by seat.
    pub players: Vec<Player>,
    /// The hands went to showdown and live hands are shown.
    pub revealed: bool,
}

impl RoundState {
    /// The player on turn.
    pub fn turn_player(&self) -> Option<&Player> {
        self.turn.and_then(|seat| self.players.get(seat))
    }

    /// Finds a player seat.
    pub fn seat_of(&self, player_id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == player_id)
    }

    /// The chips the player at this seat needs to call.
    pub fn to_call(&self, seat: usize) -> Chips {
        self.players
            .get(seat)
            .map(|p| (self.street_high - p.bet).min(p.chips))
            .unwrap_or_default()
    }

    /// The minimum total street bet for a raise.
    pub fn min_raise_to(&self) -> Chips {
        self.street_high + self.min_raise
    }

    /// The actions the player at this seat can take, a raise holds the minimum
    /// total bet.
    pub fn legal_actions(&self, seat: usize) -> Vec<Action> {
        let Some(player) = self.players.get(seat) else {
            return Vec::default();
        };

        if self.turn != Some(seat) {
            return Vec::default();
        }

        let mut actions = vec![Action::Fold];

        if player.bet >= self.street_high {
            actions.push(Action::Check);
        } else if player.chips > self.street_high - player.bet {
            actions.push(Action::Call);
        }

        if player.bet + player.chips > self.min_raise_to() {
            actions.push(Action::Raise(self.min_raise_to()));
        }

        actions.push(Action::AllIn);
        actions
    }

    /// Returns a copy of this state as seen by a player, with other players
    /// cards covered unless they are shown at showdown.
    pub fn covered_for(&self, viewer: &PlayerId) -> RoundState {
        let mut state = self.clone();
        for player in state.players.iter_mut() {
            if &player.id == viewer || (self.revealed && player.is_live()) {
                continue;
            }

            if !matches!(player.hand, PlayerCards::None) {
                player.hand = if player.is_live() {
                    PlayerCards::Covered
                } else {
                    PlayerCards::None
                };
            }
        }

        state
    }
}
