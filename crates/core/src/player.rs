// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table player types.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::poker::{Chips, PlayerCards};

/// A player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a new player id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who decides the player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Actions come from a person.
    Human,
    /// Actions come from a bot strategy.
    Bot,
}

/// The player status in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// The player is in the hand and can act.
    Active,
    /// The player folded this hand.
    Folded,
    /// The player has committed all chips.
    AllIn,
    /// The player has no chips and is not dealt in.
    Busted,
}

/// The label displayed next to a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionLabel {
    /// Nothing to show.
    #[default]
    None,
    /// Posted the small blind.
    SmallBlind,
    /// Posted the big blind.
    BigBlind,
    /// Folded.
    Fold,
    /// Checked.
    Check,
    /// Called.
    Call,
    /// Raised to the given street bet.
    Raise(Chips),
    /// Went all in.
    AllIn,
    /// Won the pot.
    Winner,
    /// A chat line, only cosmetic.
    Chat(String),
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionLabel::None => Ok(()),
            ActionLabel::SmallBlind => write!(f, "Small blind"),
            ActionLabel::BigBlind => write!(f, "Big blind"),
            ActionLabel::Fold => write!(f, "Fold"),
            ActionLabel::Check => write!(f, "Check"),
            ActionLabel::Call => write!(f, "Call"),
            ActionLabel::Raise(chips) => write!(f, "Raise {chips}"),
            ActionLabel::AllIn => write!(f, "All In!"),
            ActionLabel::Winner => write!(f, "WINNER"),
            ActionLabel::Chat(text) => write!(f, "\"{text}\""),
        }
    }
}

/// A table player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// The player id.
    pub id: PlayerId,
    /// This player name.
    pub name: String,
    /// Human or bot.
    pub kind: PlayerKind,
    /// This player chips.
    pub chips: Chips,
    /// The player bet in the current street.
    pub bet: Chips,
    /// The chips this player put in the pot this round.
    pub committed: Chips,
    /// The player status.
    pub status: PlayerStatus,
    /// This player hole cards.
    pub hand: PlayerCards,
    /// The last action label.
    pub label: ActionLabel,
}

impl Player {
    /// Creates a new player.
    pub fn new(id: PlayerId, name: impl Into<String>, kind: PlayerKind, chips: Chips) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            chips,
            bet: Chips::ZERO,
            committed: Chips::ZERO,
            status: if chips.is_zero() {
                PlayerStatus::Busted
            } else {
                PlayerStatus::Active
            },
            hand: PlayerCards::None,
            label: ActionLabel::None,
        }
    }

    /// Updates this player street bet to the given chips amount.
    ///
    /// If the player doesn't have enough chips goes all in, returns the chips
    /// moved from the player stack.
    pub fn bet_to(&mut self, chips: Chips) -> Chips {
        // How much to bet considering previous bets.
        let remainder = (chips - self.bet).min(self.chips);

        self.bet += remainder;
        self.committed += remainder;
        self.chips -= remainder;

        if self.chips.is_zero() && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }

        remainder
    }

    /// Sets this player in fold state.
    pub fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
        self.label = ActionLabel::Fold;
    }

    /// The player is still in the hand, active or all in.
    pub fn is_live(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// The player can take an action.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Reset state for a new round.
    pub(crate) fn start_round(&mut self) {
        self.status = if self.chips.is_zero() {
            PlayerStatus::Busted
        } else {
            PlayerStatus::Active
        };
        self.bet = Chips::ZERO;
        self.committed = Chips::ZERO;
        self.hand = PlayerCards::None;
        self.label = ActionLabel::None;
    }
}

/// Returns the first seat at or after `from` that matches the predicate.
pub(crate) fn seat_from<F>(players: &[Player], from: usize, pred: F) -> Option<usize>
where
    F: Fn(&Player) -> bool,
{
    let n = players.len();
    (0..n).map(|i| (from + i) % n).find(|&idx| pred(&players[idx]))
}

/// Returns the first seat after `seat` that matches the predicate.
pub(crate) fn seat_after<F>(players: &[Player], seat: usize, pred: F) -> Option<usize>
where
    F: Fn(&Player) -> bool,
{
    seat_from(players, seat + 1, pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(chips: u32) -> Player {
        Player::new(PlayerId::new("p1"), "Alice", PlayerKind::Human, chips.into())
    }

    #[test]
    fn bet_moves_chips() {
        let mut p = player(100);
        assert_eq!(p.bet_to(Chips::new(20)), Chips::new(20));
        assert_eq!(p.bet_to(Chips::new(50)), Chips::new(30));
        assert_eq!(p.chips, Chips::new(50));
        assert_eq!(p.bet, Chips::new(50));
        assert_eq!(p.committed, Chips::new(50));
        assert_eq!(p.status, PlayerStatus::Active);
    }

    #[test]
    fn bet_clamps_to_stack() {
        let mut p = player(100);
        assert_eq!(p.bet_to(Chips::new(500)), Chips::new(100));
        assert_eq!(p.chips, Chips::ZERO);
        assert_eq!(p.bet, Chips::new(100));
        assert_eq!(p.status, PlayerStatus::AllIn);
    }

    #[test]
    fn start_round_busts_empty_stacks() {
        let mut p = player(100);
        p.bet_to(Chips::new(100));
        p.chips = Chips::ZERO;
        p.start_round();
        assert_eq!(p.status, PlayerStatus::Busted);
        assert_eq!(p.bet, Chips::ZERO);
        assert!(!p.is_live());
    }

    #[test]
    fn seats_wrap_around() {
        let mut players = (0..4)
            .map(|i| Player::new(PlayerId::new(format!("p{i}")), "", PlayerKind::Bot, 10.into()))
            .collect::<Vec<_>>();
        players[0].status = PlayerStatus::Folded;

        assert_eq!(seat_after(&players, 3, Player::can_act), Some(1));
        assert_eq!(seat_from(&players, 2, Player::can_act), Some(2));
        assert_eq!(seat_after(&players, 2, |p| p.chips > Chips::new(10)), None);
    }
}
