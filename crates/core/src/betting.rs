// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Betting street state machine.
//!
//! A [BettingRound] validates and applies the actions of the players for one
//! street and tells when the street is complete. Completion is tracked with a
//! counter of the players that still owe an action: it starts with all the
//! players that can act, is reset to all the other players that can act every
//! time the street bet is raised, and decrements on every action.
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{EngineError, Result},
    player::{seat_after, seat_from, ActionLabel, Player},
    poker::Chips,
};

/// A player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Give up the hand.
    Fold,
    /// Pass without betting.
    Check,
    /// Match the street bet.
    Call,
    /// Raise the street bet to the given total.
    Raise(Chips),
    /// Bet all the remaining chips.
    AllIn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Raise(chips) => write!(f, "raise {chips}"),
            Action::AllIn => write!(f, "all-in"),
        }
    }
}

impl FromStr for Action {
    type Err = EngineError;

    /// Parses `fold`, `check`, `call`, `raise <total>` and `allin`.
    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace().map(|w| w.to_ascii_lowercase());
        let action = match (words.next().as_deref(), words.next()) {
            (Some("fold" | "f"), None) => Action::Fold,
            (Some("check" | "k"), None) => Action::Check,
            (Some("call" | "c"), None) => Action::Call,
            (Some("allin" | "all-in" | "a"), None) => Action::AllIn,
            (Some("raise" | "r"), Some(amount)) => {
                let amount = amount
                    .parse::<u32>()
                    .map_err(|_| EngineError::InvalidAction(format!("bad raise amount {amount}")))?;
                Action::Raise(amount.into())
            }
            _ => return Err(EngineError::InvalidAction(format!("unknown action {s:?}"))),
        };

        if words.next().is_some() {
            return Err(EngineError::InvalidAction(format!("unknown action {s:?}")));
        }

        Ok(action)
    }
}

/// The state of a betting street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreetStatus {
    /// Waiting for the player at this seat.
    AwaitingAction(usize),
    /// All players have acted and matched the street bet.
    StreetComplete,
    /// All other players folded, the player at this seat wins.
    HandComplete(usize),
}

/// A betting street.
#[derive(Debug, Clone)]
pub struct BettingRound {
    street_high: Chips,
    min_raise: Chips,
    to_act: usize,
    status: StreetStatus,
}

impl BettingRound {
    /// Starts a street with the first player to act at or after the `first` seat.
    ///
    /// The street high is the bet to match, for preflop this is the big blind.
    pub fn new(players: &[Player], first: usize, street_high: Chips, min_raise: Chips) -> Self {
        let mut round = Self {
            street_high,
            min_raise,
            to_act: players.iter().filter(|p| p.can_act()).count(),
            status: StreetStatus::StreetComplete,
        };

        let live = players.iter().filter(|p| p.is_live()).count();
        let owes_chips = players
            .iter()
            .any(|p| p.can_act() && p.bet < round.street_high);

        round.status = if live < 2 {
            match seat_from(players, 0, Player::is_live) {
                Some(seat) => StreetStatus::HandComplete(seat),
                None => StreetStatus::StreetComplete,
            }
        } else if round.to_act == 0 || (round.to_act == 1 && !owes_chips) {
            // Nobody left to bet against.
            round.to_act = 0;
            StreetStatus::StreetComplete
        } else {
            match seat_from(players, first, Player::can_act) {
                Some(seat) => StreetStatus::AwaitingAction(seat),
                None => StreetStatus::StreetComplete,
            }
        };

        round
    }

    /// The street state.
    pub fn status(&self) -> StreetStatus {
        self.status
    }

    /// The seat on turn if the street is waiting for an action.
    pub fn turn(&self) -> Option<usize> {
        match self.status {
            StreetStatus::AwaitingAction(seat) => Some(seat),
            _ => None,
        }
    }

    /// The highest bet in this street.
    pub fn street_high(&self) -> Chips {
        self.street_high
    }

    /// The minimum raise size.
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }

    /// Number of players that still have to act.
    pub fn to_act(&self) -> usize {
        self.to_act
    }

    /// Applies an action from the player at `seat`.
    ///
    /// Returns an error and leaves players and street unchanged if the action
    /// is not legal. Bets larger than the player stack are clamped to an all in.
    pub fn apply(&mut self, players: &mut [Player], seat: usize, action: Action) -> Result<StreetStatus> {
        let turn = self
            .turn()
            .ok_or_else(|| EngineError::InvalidAction("betting is closed".to_string()))?;

        if seat != turn {
            return Err(EngineError::InvalidAction(format!(
                "seat {seat} is not on turn"
            )));
        }

        let player = &players[seat];
        if !player.can_act() {
            return Err(EngineError::InvalidAction(format!(
                "{} cannot act",
                player.name
            )));
        }

        let stack = player.bet + player.chips;
        let action = match action {
            // Overcommitting goes all in.
            Action::Raise(total) if total >= stack => Action::AllIn,
            Action::Call if player.chips <= self.street_high - player.bet => Action::AllIn,
            action => action,
        };

        // Validate before changing any state.
        match action {
            Action::Fold | Action::AllIn => {}
            Action::Check if player.bet < self.street_high => {
                return Err(EngineError::InvalidAction(format!(
                    "cannot check facing a bet of {}",
                    self.street_high - player.bet
                )));
            }
            Action::Check => {}
            Action::Call if player.bet >= self.street_high => {
                return Err(EngineError::InvalidAction(
                    "nothing to call, check instead".to_string(),
                ));
            }
            Action::Call => {}
            Action::Raise(total) if total <= self.street_high => {
                return Err(EngineError::InvalidAction(format!(
                    "raise to {total} must be above {}",
                    self.street_high
                )));
            }
            Action::Raise(total) if total - self.street_high < self.min_raise => {
                return Err(EngineError::InvalidAction(format!(
                    "minimum raise is to {}",
                    self.street_high + self.min_raise
                )));
            }
            Action::Raise(_) => {}
        }

        debug!("{} {action}", players[seat].name);

        let player = &mut players[seat];
        match action {
            Action::Fold => player.fold(),
            Action::Check => player.label = ActionLabel::Check,
            Action::Call => {
                player.bet_to(self.street_high);
                player.label = ActionLabel::Call;
            }
            Action::Raise(total) => {
                player.bet_to(total);
                player.label = ActionLabel::Raise(total);
            }
            Action::AllIn => {
                player.bet_to(stack);
                player.label = ActionLabel::AllIn;
            }
        }

        let new_bet = players[seat].bet;
        if new_bet > self.street_high {
            // A short all in raises the bet but not the minimum raise.
            let raise = new_bet - self.street_high;
            self.min_raise = self.min_raise.max(raise);
            self.street_high = new_bet;

            // Everybody else has to act again.
            self.to_act = players
                .iter()
                .enumerate()
                .filter(|(idx, p)| *idx != seat && p.can_act())
                .count();
        } else {
            self.to_act = self.to_act.saturating_sub(1);
        }

        let live = players.iter().filter(|p| p.is_live()).count();
        self.status = if live == 1 {
            let winner = seat_from(players, 0, Player::is_live).unwrap_or(seat);
            StreetStatus::HandComplete(winner)
        } else if self.to_act == 0 {
            StreetStatus::StreetComplete
        } else {
            match seat_after(players, seat, Player::can_act) {
                Some(next) => StreetStatus::AwaitingAction(next),
                None => StreetStatus::StreetComplete,
            }
        };

        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerId, PlayerKind, PlayerStatus};

    fn players(stacks: &[u32]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Player::new(
                    PlayerId::new(format!("p{i}")),
                    format!("Player{i}"),
                    PlayerKind::Bot,
                    Chips::new(*c),
                )
            })
            .collect()
    }

    fn total(players: &[Player]) -> Chips {
        players.iter().map(|p| p.chips + p.committed).sum()
    }

    #[test]
    fn check_around_completes_street() {
        let mut ps = players(&[1000, 1000, 1000]);
        let mut round = BettingRound::new(&ps, 1, Chips::ZERO, Chips::new(20));
        assert_eq!(round.status(), StreetStatus::AwaitingAction(1));

        assert_eq!(round.apply(&mut ps, 1, Action::Check), Ok(StreetStatus::AwaitingAction(2)));
        assert_eq!(round.apply(&mut ps, 2, Action::Check), Ok(StreetStatus::AwaitingAction(0)));
        assert_eq!(round.apply(&mut ps, 0, Action::Check), Ok(StreetStatus::StreetComplete));
        assert_eq!(round.turn(), None);
    }

    #[test]
    fn check_then_bet_reopens_action() {
        let mut ps = players(&[1000, 1000, 1000]);
        let mut round = BettingRound::new(&ps, 0, Chips::ZERO, Chips::new(20));

        round.apply(&mut ps, 0, Action::Check).unwrap();
        round.apply(&mut ps, 1, Action::Raise(Chips::new(100))).unwrap();
        assert_eq!(round.to_act(), 2);

        // Player 2 matching the bet does not end the street, player 0 checked
        // before the raise.
        assert_eq!(round.apply(&mut ps, 2, Action::Call), Ok(StreetStatus::AwaitingAction(0)));
        assert_eq!(round.apply(&mut ps, 0, Action::Call), Ok(StreetStatus::StreetComplete));
        assert!(ps.iter().all(|p| p.bet == Chips::new(100)));
    }

    #[test]
    fn raise_tracks_min_raise() {
        let mut ps = players(&[5000, 5000, 5000]);
        let mut round = BettingRound::new(&ps, 0, Chips::new(20), Chips::new(20));

        round.apply(&mut ps, 0, Action::Raise(Chips::new(120))).unwrap();
        assert_eq!(round.street_high(), Chips::new(120));
        assert_eq!(round.min_raise(), Chips::new(100));

        // Raise by less than the last raise.
        let err = round.apply(&mut ps, 1, Action::Raise(Chips::new(150)));
        assert!(matches!(err, Err(EngineError::InvalidAction(_))));

        round.apply(&mut ps, 1, Action::Raise(Chips::new(400))).unwrap();
        assert_eq!(round.min_raise(), Chips::new(280));
        assert_eq!(round.street_high(), Chips::new(400));
    }

    #[test]
    fn invalid_actions_leave_state_unchanged() {
        let mut ps = players(&[1000, 1000]);
        ps[0].bet_to(Chips::new(20));
        let mut round = BettingRound::new(&ps, 1, Chips::new(20), Chips::new(20));
        let before = format!("{ps:?}{round:?}");

        assert!(round.apply(&mut ps, 1, Action::Check).is_err());
        assert!(round.apply(&mut ps, 0, Action::Call).is_err());
        assert!(round.apply(&mut ps, 1, Action::Raise(Chips::new(20))).is_err());
        assert_eq!(before, format!("{ps:?}{round:?}"));
    }

    #[test]
    fn short_call_goes_all_in() {
        let mut ps = players(&[1000, 50, 1000]);
        let mut round = BettingRound::new(&ps, 0, Chips::ZERO, Chips::new(20));

        round.apply(&mut ps, 0, Action::Raise(Chips::new(200))).unwrap();
        round.apply(&mut ps, 1, Action::Call).unwrap();

        assert_eq!(ps[1].status, PlayerStatus::AllIn);
        assert_eq!(ps[1].chips, Chips::ZERO);
        assert_eq!(ps[1].bet, Chips::new(50));
        assert_eq!(round.street_high(), Chips::new(200));

        // All in players are skipped.
        assert_eq!(round.apply(&mut ps, 2, Action::Call), Ok(StreetStatus::StreetComplete));
    }

    #[test]
    fn overcommit_is_clamped() {
        let mut ps = players(&[1000, 300, 1000]);
        let mut round = BettingRound::new(&ps, 1, Chips::ZERO, Chips::new(20));

        round.apply(&mut ps, 1, Action::Raise(Chips::new(5000))).unwrap();
        assert_eq!(ps[1].status, PlayerStatus::AllIn);
        assert_eq!(ps[1].bet, Chips::new(300));
        assert_eq!(ps[1].label, ActionLabel::AllIn);
        assert_eq!(round.street_high(), Chips::new(300));
        assert_eq!(round.to_act(), 2);
    }

    #[test]
    fn all_in_above_high_reopens() {
        let mut ps = players(&[1000, 150, 1000]);
        let mut round = BettingRound::new(&ps, 0, Chips::ZERO, Chips::new(20));

        round.apply(&mut ps, 0, Action::Raise(Chips::new(100))).unwrap();
        round.apply(&mut ps, 1, Action::AllIn).unwrap();
        assert_eq!(round.street_high(), Chips::new(150));
        // Short all in keeps the last full raise.
        assert_eq!(round.min_raise(), Chips::new(100));

        round.apply(&mut ps, 2, Action::Call).unwrap();
        assert_eq!(round.status(), StreetStatus::AwaitingAction(0));
        assert_eq!(round.apply(&mut ps, 0, Action::Call), Ok(StreetStatus::StreetComplete));
    }

    #[test]
    fn fold_removes_player_from_rotation() {
        let mut ps = players(&[1000, 1000, 1000]);
        let mut round = BettingRound::new(&ps, 0, Chips::ZERO, Chips::new(20));

        round.apply(&mut ps, 0, Action::Raise(Chips::new(40))).unwrap();
        round.apply(&mut ps, 1, Action::Fold).unwrap();
        assert_eq!(ps[1].chips, Chips::new(1000));
        assert_eq!(ps[1].status, PlayerStatus::Folded);

        round.apply(&mut ps, 2, Action::Raise(Chips::new(80))).unwrap();
        // Seat 1 is skipped.
        assert_eq!(round.status(), StreetStatus::AwaitingAction(0));
    }

    #[test]
    fn last_player_standing() {
        let mut ps = players(&[1000, 1000, 1000]);
        let mut round = BettingRound::new(&ps, 0, Chips::ZERO, Chips::new(20));
        let chips = total(&ps);

        round.apply(&mut ps, 0, Action::Raise(Chips::new(60))).unwrap();
        round.apply(&mut ps, 1, Action::Fold).unwrap();
        assert_eq!(round.apply(&mut ps, 2, Action::Fold), Ok(StreetStatus::HandComplete(0)));
        assert_eq!(total(&ps), chips);
        assert!(round.apply(&mut ps, 0, Action::Check).is_err());
    }

    #[test]
    fn nobody_left_to_bet() {
        let mut ps = players(&[1000, 0, 1000]);
        ps[1].status = PlayerStatus::AllIn;
        ps[2].status = PlayerStatus::AllIn;
        let round = BettingRound::new(&ps, 0, Chips::ZERO, Chips::new(20));
        assert_eq!(round.status(), StreetStatus::StreetComplete);
    }

    #[test]
    fn parse_actions() {
        assert_eq!("fold".parse(), Ok(Action::Fold));
        assert_eq!("Check".parse(), Ok(Action::Check));
        assert_eq!("c".parse(), Ok(Action::Call));
        assert_eq!("raise 120".parse(), Ok(Action::Raise(Chips::new(120))));
        assert_eq!("allin".parse(), Ok(Action::AllIn));
        assert!("raise".parse::<Action>().is_err());
        assert!("raise ten".parse::<Action>().is_err());
        assert!("check 10".parse::<Action>().is_err());
    }
}
