// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Round controller.
//!
//! A [Table] owns the seated players and runs a hand from the blinds to the
//! showdown, all mutations go through [Table::start_round],
//! [Table::submit_action] and [Table::end_or_continue].
use ahash::AHashMap;
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    betting::{Action, BettingRound, StreetStatus},
    error::{EngineError, Result},
    game_state::{RoundState, Stage},
    player::{ActionLabel, Player, PlayerId, seat_after},
    poker::{Card, Chips, Deck, HandValue, PlayerCards, RoundId},
};

/// The chips each player starts with.
pub const INITIAL_CHIPS: Chips = Chips::new(2_000);

/// Table configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// The small blind.
    pub small_blind: Chips,
    /// The big blind, also the minimum bet.
    pub big_blind: Chips,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: Chips::new(10),
            big_blind: Chips::new(20),
        }
    }
}

/// The chips won by a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payoff {
    /// The winner id.
    pub player_id: PlayerId,
    /// The winner name.
    pub name: String,
    /// The chips won.
    pub chips: Chips,
    /// The winning hand, none if all other players folded.
    pub hand: Option<HandValue>,
}

/// The result of a settled round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandOutcome {
    /// The settled round.
    pub round_id: RoundId,
    /// The pot that has been awarded.
    pub pot: Chips,
    /// The hands were compared at showdown.
    pub showdown: bool,
    /// The winners payoffs.
    pub payoffs: Vec<Payoff>,
}

/// What comes after a settled round.
#[derive(Debug, Clone)]
pub enum GameProgress {
    /// A new round has started.
    Continue(RoundState),
    /// Fewer than two players have chips.
    GameOver {
        /// The player left with chips.
        winner: Option<PlayerId>,
    },
}

/// A pot layer and the seats that can win it.
#[derive(Debug)]
struct Pot {
    chips: Chips,
    eligible: Vec<usize>,
}

/// The round controller.
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    players: Vec<Player>,
    rng: StdRng,
    round_id: RoundId,
    stage: Stage,
    deck: Deck,
    board: Vec<Card>,
    pot: Chips,
    dealer: usize,
    betting: Option<BettingRound>,
    outcome: Option<HandOutcome>,
}

impl Table {
    /// Creates a new table with the given players.
    pub fn new(players: Vec<Player>, config: TableConfig) -> Self {
        Self::with_rng(players, config, StdRng::from_os_rng())
    }

    /// Creates a new table with user initialized randomness.
    pub fn with_rng(players: Vec<Player>, config: TableConfig, rng: StdRng) -> Self {
        // There must be at least 2 seats.
        assert!(players.len() > 1);

        Self {
            config,
            players,
            rng,
            round_id: RoundId::NONE,
            stage: Stage::Showdown,
            deck: Deck::default(),
            board: Vec::with_capacity(5),
            pot: Chips::ZERO,
            dealer: 0,
            betting: None,
            outcome: None,
        }
    }

    /// Starts a new round with the dealer button at the given seat.
    ///
    /// Resets the players, deals the hole cards and posts the blinds.
    pub fn start_round(&mut self, dealer: usize) -> Result<RoundState> {
        if self.betting.is_some() {
            return Err(EngineError::RoundInProgress);
        }

        if self.count_with_chips() < 2 {
            return Err(EngineError::NotEnoughPlayers);
        }

        let n = self.players.len();
        self.round_id = self.round_id.next();
        self.dealer = dealer % n;
        self.stage = Stage::Preflop;
        self.deck = Deck::new_and_shuffled(&mut self.rng);
        self.board.clear();
        self.pot = Chips::ZERO;
        self.outcome = None;

        self.players.iter_mut().for_each(Player::start_round);

        // Deal two passes starting left of the dealer.
        let order = (1..=n).map(|i| (self.dealer + i) % n).collect::<Vec<_>>();
        let mut first_cards = vec![None; n];
        for &seat in &order {
            if self.players[seat].is_live() {
                first_cards[seat] = Some(self.deck.draw()?);
            }
        }

        for &seat in &order {
            if let Some(c1) = first_cards[seat] {
                let c2 = self.deck.draw()?;
                self.players[seat].hand = PlayerCards::Cards(c1, c2);
            }
        }

        // Blinds go to the next live seats after the dealer.
        let sb = seat_after(&self.players, self.dealer, Player::is_live)
            .ok_or(EngineError::NotEnoughPlayers)?;
        let bb = seat_after(&self.players, sb, Player::is_live)
            .ok_or(EngineError::NotEnoughPlayers)?;

        self.post_blind(sb, self.config.small_blind, ActionLabel::SmallBlind);
        self.post_blind(bb, self.config.big_blind, ActionLabel::BigBlind);

        info!(
            "Round {} dealer {} blinds {}/{} pot {}",
            self.round_id,
            self.players[self.dealer].name,
            self.config.small_blind,
            self.config.big_blind,
            self.pot
        );

        self.betting = Some(BettingRound::new(
            &self.players,
            (bb + 1) % n,
            self.config.big_blind,
            self.config.big_blind,
        ));

        self.progress()?;
        Ok(self.round_state())
    }

    /// Applies an action from a player.
    ///
    /// An invalid action returns an error and leaves the round unchanged.
    pub fn submit_action(&mut self, player_id: &PlayerId, action: Action) -> Result<RoundState> {
        let seat = self
            .players
            .iter()
            .position(|p| &p.id == player_id)
            .ok_or_else(|| EngineError::UnknownPlayer(player_id.clone()))?;

        let betting = self
            .betting
            .as_mut()
            .ok_or(EngineError::NoRoundInProgress)?;

        let committed = self.players[seat].committed;
        betting.apply(&mut self.players, seat, action)?;
        self.pot += self.players[seat].committed - committed;

        self.progress()?;
        Ok(self.round_state())
    }

    /// Starts the next round moving the dealer button one seat, or ends the
    /// game if fewer than two players have chips.
    pub fn end_or_continue(&mut self) -> Result<GameProgress> {
        if self.betting.is_some() {
            return Err(EngineError::RoundInProgress);
        }

        if self.count_with_chips() < 2 {
            let winner = self
                .players
                .iter()
                .find(|p| !p.chips.is_zero())
                .map(|p| p.id.clone());

            info!(
                "Game over winner {}",
                winner.as_ref().map(|w| w.as_str()).unwrap_or("none")
            );

            return Ok(GameProgress::GameOver { winner });
        }

        let dealer = (self.dealer + 1) % self.players.len();
        self.start_round(dealer).map(GameProgress::Continue)
    }

    /// Sets a chat label for a player, ignored if the round has changed.
    ///
    /// Only the cosmetic label is updated.
    pub fn set_chat(&mut self, round_id: RoundId, player_id: &PlayerId, text: String) -> bool {
        if round_id != self.round_id {
            return false;
        }

        match self.players.iter_mut().find(|p| &p.id == player_id) {
            Some(player) => {
                player.label = ActionLabel::Chat(text);
                true
            }
            None => false,
        }
    }

    /// Returns a snapshot of the round.
    pub fn round_state(&self) -> RoundState {
        RoundState {
            round_id: self.round_id,
            stage: self.stage,
            pot: self.pot,
            street_high: self
                .betting
                .as_ref()
                .map(BettingRound::street_high)
                .unwrap_or_default(),
            min_raise: self
                .betting
                .as_ref()
                .map(BettingRound::min_raise)
                .unwrap_or(self.config.big_blind),
            dealer: self.dealer,
            turn: self.betting.as_ref().and_then(BettingRound::turn),
            board: self.board.clone(),
            players: self.players.clone(),
            revealed: self.outcome.as_ref().is_some_and(|o| o.showdown),
        }
    }

    /// The players by seat.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The outcome of the last settled round.
    pub fn outcome(&self) -> Option<&HandOutcome> {
        self.outcome.as_ref()
    }

    /// The current round id.
    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    /// The table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Number of cards left in the deck.
    pub fn deck_count(&self) -> usize {
        self.deck.count()
    }

    /// Checks if a round is being played.
    pub fn is_round_in_progress(&self) -> bool {
        self.betting.is_some()
    }

    fn count_with_chips(&self) -> usize {
        self.players.iter().filter(|p| !p.chips.is_zero()).count()
    }

    fn post_blind(&mut self, seat: usize, blind: Chips, label: ActionLabel) {
        let player = &mut self.players[seat];
        self.pot += player.bet_to(blind);
        player.label = label;
    }

    /// Moves the round forward until an action is needed or the round is settled.
    fn progress(&mut self) -> Result<()> {
        loop {
            let Some(betting) = &self.betting else {
                return Ok(());
            };

            match betting.status() {
                StreetStatus::AwaitingAction(_) => return Ok(()),
                StreetStatus::HandComplete(seat) => {
                    self.award_last_player(seat);
                    return Ok(());
                }
                StreetStatus::StreetComplete if self.stage == Stage::River => {
                    self.showdown();
                    return Ok(());
                }
                StreetStatus::StreetComplete => self.advance_street()?,
            }
        }
    }

    /// Deals the next street board cards and starts its betting.
    fn advance_street(&mut self) -> Result<()> {
        for player in self.players.iter_mut() {
            player.bet = Chips::ZERO;
            player.label = ActionLabel::None;
        }

        let (stage, count) = match self.stage {
            Stage::Preflop => (Stage::Flop, 3),
            Stage::Flop => (Stage::Turn, 1),
            Stage::Turn => (Stage::River, 1),
            Stage::River | Stage::Showdown => return Ok(()),
        };

        for _ in 0..count {
            let card = self.deck.draw()?;
            self.board.push(card);
        }

        self.stage = stage;

        let board = self
            .board
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        info!("Round {} {stage} [{board}] pot {}", self.round_id, self.pot);

        self.betting = Some(BettingRound::new(
            &self.players,
            (self.dealer + 1) % self.players.len(),
            Chips::ZERO,
            self.config.big_blind,
        ));

        Ok(())
    }

    /// All other players folded, the last player gets the pot without showing.
    fn award_last_player(&mut self, seat: usize) {
        let pot = self.pot;
        let player = &self.players[seat];
        info!("Round {} {} wins {pot}, all others folded", self.round_id, player.name);

        let payoff = Payoff {
            player_id: player.id.clone(),
            name: player.name.clone(),
            chips: pot,
            hand: None,
        };

        self.settle(vec![(seat, pot)], vec![payoff], false);
    }

    /// Compares the live hands and splits each pot among its best hands.
    fn showdown(&mut self) {
        let values = self
            .players
            .iter()
            .map(|p| match p.hand.cards() {
                Some([c1, c2]) if p.is_live() => {
                    let mut cards = vec![c1, c2];
                    cards.extend_from_slice(&self.board);
                    Some(HandValue::eval(&cards))
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        let mut winnings = AHashMap::new();
        for pot in self.pots() {
            let Some(best) = pot.eligible.iter().filter_map(|&s| values[s].as_ref()).max() else {
                continue;
            };

            // Winners are in seat order from the dealer left, they get odd chips first.
            let winners = pot
                .eligible
                .iter()
                .copied()
                .filter(|&s| values[s].as_ref() == Some(best))
                .collect::<Vec<_>>();

            let share = pot.chips / winners.len() as u32;
            let odd = (pot.chips % winners.len() as u32).amount() as usize;
            for (idx, seat) in winners.into_iter().enumerate() {
                let chips = if idx < odd { share + Chips::new(1) } else { share };
                *winnings.entry(seat).or_insert(Chips::ZERO) += chips;
            }
        }

        let mut awards = winnings.into_iter().collect::<Vec<_>>();
        awards.sort_by_key(|(seat, _)| self.seat_order(*seat));

        let payoffs = awards
            .iter()
            .map(|&(seat, chips)| {
                let player = &self.players[seat];
                let hand = values[seat].clone();
                info!(
                    "Round {} {} wins {chips} with {}",
                    self.round_id,
                    player.name,
                    hand.as_ref().map(|h| h.to_string()).unwrap_or_default()
                );

                Payoff {
                    player_id: player.id.clone(),
                    name: player.name.clone(),
                    chips,
                    hand,
                }
            })
            .collect();

        self.settle(awards, payoffs, true);
    }

    /// Credits the awards and closes the round.
    fn settle(&mut self, awards: Vec<(usize, Chips)>, payoffs: Vec<Payoff>, showdown: bool) {
        debug_assert_eq!(
            awards.iter().map(|(_, c)| *c).sum::<Chips>(),
            self.pot,
            "awards must add up to the pot"
        );

        for player in self.players.iter_mut() {
            player.bet = Chips::ZERO;
        }

        for (seat, chips) in awards {
            let player = &mut self.players[seat];
            player.chips += chips;
            player.label = ActionLabel::Winner;
        }

        self.outcome = Some(HandOutcome {
            round_id: self.round_id,
            pot: self.pot,
            showdown,
            payoffs,
        });

        self.pot = Chips::ZERO;
        self.stage = Stage::Showdown;
        self.betting = None;
    }

    /// Splits the committed chips in layers, one for each all in level.
    fn pots(&self) -> Vec<Pot> {
        let n = self.players.len();
        let order = (1..=n).map(|i| (self.dealer + i) % n).collect::<Vec<_>>();

        let mut levels = self
            .players
            .iter()
            .filter(|p| p.is_live())
            .map(|p| p.committed)
            .collect::<Vec<_>>();
        levels.sort();
        levels.dedup();

        let mut pots = Vec::with_capacity(levels.len());
        let mut prev = Chips::ZERO;
        for level in levels {
            let chips = self
                .players
                .iter()
                .map(|p| p.committed.min(level) - p.committed.min(prev))
                .sum();

            let eligible = order
                .iter()
                .copied()
                .filter(|&s| self.players[s].is_live() && self.players[s].committed >= level)
                .collect();

            pots.push(Pot { chips, eligible });
            prev = level;
        }

        // Folded players chips above the highest live bet.
        let rest = self.players.iter().map(|p| p.committed - prev).sum::<Chips>();
        if let Some(pot) = pots.last_mut() {
            pot.chips += rest;
        }

        pots.retain(|p| !p.chips.is_zero());
        debug!("Round {} pots {pots:?}", self.round_id);
        pots
    }

    /// Position of a seat starting left of the dealer.
    fn seat_order(&self, seat: usize) -> usize {
        let n = self.players.len();
        (seat + n - self.dealer - 1) % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerKind, PlayerStatus};
    use showdown_eval::HandCategory;

    fn new_table(stacks: &[u32]) -> Table {
        let players = stacks
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Player::new(
                    PlayerId::new(format!("p{i}")),
                    format!("Player{i}"),
                    if i == 0 {
                        PlayerKind::Human
                    } else {
                        PlayerKind::Bot
                    },
                    Chips::new(*c),
                )
            })
            .collect();

        Table::with_rng(players, TableConfig::default(), StdRng::seed_from_u64(13))
    }

    fn id(seat: usize) -> PlayerId {
        PlayerId::new(format!("p{seat}"))
    }

    fn total_chips(table: &Table) -> Chips {
        table.players().iter().map(|p| p.chips).sum::<Chips>() + table.pot
    }

    fn cards(s: &str) -> PlayerCards {
        let c = s
            .split_whitespace()
            .map(|c| c.parse::<Card>().unwrap())
            .collect::<Vec<_>>();
        PlayerCards::Cards(c[0], c[1])
    }

    fn dealt(table: &Table) -> usize {
        table
            .players()
            .iter()
            .filter(|p| p.hand.cards().is_some())
            .count()
    }

    /// Sets the hands and board then checks down to showdown.
    fn rig_and_check_down(table: &mut Table, hands: &[(usize, &str)], board: &str) {
        for (seat, hand) in hands {
            table.players[*seat].hand = cards(hand);
        }

        let board = board
            .split_whitespace()
            .map(|c| c.parse::<Card>().unwrap())
            .collect::<Vec<_>>();
        let dealt = table.board.len();
        table.board = board[..dealt].to_vec();

        let mut used = board.clone();
        for player in table.players() {
            used.extend(player.hand.cards().into_iter().flatten());
        }

        // Keep the deck size, the next board cards are drawn from the end.
        let upcoming = &board[dealt..];
        let mut cards = Deck::default()
            .into_iter()
            .filter(|c| !used.contains(c))
            .take(table.deck_count() - upcoming.len())
            .collect::<Vec<_>>();
        cards.extend(upcoming.iter().rev());
        table.deck = Deck::from(cards);

        while let Some(seat) = table.round_state().turn {
            let action = if table.round_state().to_call(seat).is_zero() {
                Action::Check
            } else {
                Action::Call
            };
            table.submit_action(&id(seat), action).unwrap();
        }
    }

    #[test]
    fn initialize_round_posts_blinds() {
        let mut table = new_table(&[2000; 6]);
        let state = table.start_round(0).unwrap();

        assert_eq!(state.players[1].chips, Chips::new(1990));
        assert_eq!(state.players[1].bet, Chips::new(10));
        assert_eq!(state.players[1].label, ActionLabel::SmallBlind);
        assert_eq!(state.players[2].chips, Chips::new(1980));
        assert_eq!(state.players[2].bet, Chips::new(20));
        assert_eq!(state.turn, Some(3));
        assert_eq!(state.pot, Chips::new(30));
        assert_eq!(state.street_high, Chips::new(20));
        assert_eq!(state.min_raise, Chips::new(20));
        assert_eq!(state.stage, Stage::Preflop);
        assert!(state.board.is_empty());

        // Deck, hole cards and board add up to 52.
        assert_eq!(table.deck_count() + 2 * dealt(&table), Deck::SIZE);
    }

    #[test]
    fn busted_players_are_not_dealt() {
        let mut table = new_table(&[2000, 0, 2000, 2000]);
        let state = table.start_round(0).unwrap();

        assert_eq!(state.players[1].status, PlayerStatus::Busted);
        assert_eq!(state.players[1].hand, PlayerCards::None);
        // Blinds skip the busted seat.
        assert_eq!(state.players[2].bet, Chips::new(10));
        assert_eq!(state.players[3].bet, Chips::new(20));
        assert_eq!(state.turn, Some(0));
        assert_eq!(table.deck_count() + 2 * 3, Deck::SIZE);
    }

    #[test]
    fn blinds_are_clamped_to_stack() {
        let mut table = new_table(&[2000, 5, 2000]);
        let state = table.start_round(0).unwrap();
        assert_eq!(state.players[1].bet, Chips::new(5));
        assert_eq!(state.players[1].status, PlayerStatus::AllIn);
        assert_eq!(state.pot, Chips::new(25));
    }

    #[test]
    fn fold_out_awards_pot_without_showdown() {
        let mut table = new_table(&[2000; 4]);
        table.start_round(0).unwrap();
        let chips = total_chips(&table);

        table.submit_action(&id(3), Action::Raise(Chips::new(60))).unwrap();
        table.submit_action(&id(0), Action::Fold).unwrap();
        assert_eq!(table.players()[0].chips, Chips::new(2000));
        table.submit_action(&id(1), Action::Fold).unwrap();
        let state = table.submit_action(&id(2), Action::Fold).unwrap();

        assert_eq!(state.stage, Stage::Showdown);
        assert_eq!(state.turn, None);
        assert_eq!(state.pot, Chips::ZERO);
        assert!(!state.revealed);
        assert_eq!(state.players[3].chips, Chips::new(2030));
        assert_eq!(state.players[3].label, ActionLabel::Winner);
        assert_eq!(total_chips(&table), chips);

        let outcome = table.outcome().unwrap();
        assert!(!outcome.showdown);
        assert_eq!(outcome.pot, Chips::new(90));
        assert_eq!(outcome.payoffs.len(), 1);
        assert!(outcome.payoffs[0].hand.is_none());
    }

    #[test]
    fn streets_deal_board_cards() {
        let mut table = new_table(&[2000; 3]);
        table.start_round(0).unwrap();

        // Button calls, small blind calls, big blind checks.
        table.submit_action(&id(0), Action::Call).unwrap();
        table.submit_action(&id(1), Action::Call).unwrap();
        let state = table.submit_action(&id(2), Action::Check).unwrap();

        assert_eq!(state.stage, Stage::Flop);
        assert_eq!(state.board.len(), 3);
        assert_eq!(state.pot, Chips::new(60));
        assert_eq!(state.street_high, Chips::ZERO);
        assert!(state.players.iter().all(|p| p.bet.is_zero()));
        assert!(state.players.iter().all(|p| p.label == ActionLabel::None));
        // Action starts left of the dealer.
        assert_eq!(state.turn, Some(1));
        assert_eq!(table.deck_count() + 2 * 3 + 3, Deck::SIZE);

        for stage in [Stage::Turn, Stage::River] {
            for seat in [1, 2, 0] {
                table.submit_action(&id(seat), Action::Check).unwrap();
            }
            assert_eq!(table.round_state().stage, stage);
        }

        assert_eq!(table.round_state().board.len(), 5);
        assert_eq!(table.deck_count() + 2 * 3 + 5, Deck::SIZE);

        let chips = total_chips(&table);
        for seat in [1, 2, 0] {
            table.submit_action(&id(seat), Action::Check).unwrap();
        }

        let state = table.round_state();
        assert_eq!(state.stage, Stage::Showdown);
        assert!(state.revealed);
        assert_eq!(total_chips(&table), chips);
        assert!(table.outcome().unwrap().showdown);
    }

    #[test]
    fn big_blind_gets_option() {
        let mut table = new_table(&[2000; 3]);
        table.start_round(0).unwrap();

        table.submit_action(&id(0), Action::Call).unwrap();
        let state = table.submit_action(&id(1), Action::Call).unwrap();

        // All bets match but the big blind has not acted yet.
        assert_eq!(state.stage, Stage::Preflop);
        assert_eq!(state.turn, Some(2));

        let state = table
            .submit_action(&id(2), Action::Raise(Chips::new(60)))
            .unwrap();
        assert_eq!(state.turn, Some(0));
        assert_eq!(state.min_raise, Chips::new(40));
    }

    #[test]
    fn tied_hands_split_the_pot() {
        let mut table = new_table(&[2000; 3]);
        table.start_round(0).unwrap();
        table.submit_action(&id(0), Action::Fold).unwrap();

        rig_and_check_down(
            &mut table,
            &[(1, "2C 3D"), (2, "2H 3S")],
            "AS KD QH JC 9S",
        );

        let outcome = table.outcome().unwrap();
        assert_eq!(outcome.payoffs.len(), 2);
        assert!(outcome.payoffs.iter().all(|p| p.chips == Chips::new(20)));
        assert_eq!(table.players()[1].chips, Chips::new(2000));
        assert_eq!(table.players()[2].chips, Chips::new(2000));
    }

    #[test]
    fn odd_chip_goes_left_of_dealer() {
        let mut table = new_table(&[2000; 4]);
        table.start_round(0).unwrap();
        table.submit_action(&id(3), Action::Call).unwrap();
        table.submit_action(&id(0), Action::Call).unwrap();
        table.submit_action(&id(1), Action::Fold).unwrap();
        table.submit_action(&id(2), Action::Check).unwrap();

        // 10 from the small blind plus 3 * 20, three ways split.
        rig_and_check_down(
            &mut table,
            &[(0, "2C 3D"), (2, "2H 3S"), (3, "2D 3C")],
            "AS KD QH JC 9S",
        );

        let outcome = table.outcome().unwrap();
        assert_eq!(outcome.pot, Chips::new(70));
        assert_eq!(outcome.payoffs.len(), 3);
        assert_eq!(outcome.payoffs[0].player_id, id(2));
        assert_eq!(table.players()[2].chips, Chips::new(2004));
        assert_eq!(table.players()[3].chips, Chips::new(2003));
        assert_eq!(table.players()[0].chips, Chips::new(2003));
    }

    #[test]
    fn best_hand_wins_showdown() {
        let mut table = new_table(&[2000; 3]);
        table.start_round(0).unwrap();
        table.submit_action(&id(0), Action::Call).unwrap();
        table.submit_action(&id(1), Action::Call).unwrap();
        table.submit_action(&id(2), Action::Check).unwrap();

        rig_and_check_down(
            &mut table,
            &[(0, "AH AD"), (1, "KC KS"), (2, "7C 2D")],
            "AS KD 8H 4C 3S",
        );

        let outcome = table.outcome().unwrap();
        assert_eq!(outcome.payoffs.len(), 1);
        assert_eq!(outcome.payoffs[0].player_id, id(0));
        assert_eq!(
            outcome.payoffs[0].hand.as_ref().unwrap().category(),
            HandCategory::ThreeOfAKind
        );
        assert_eq!(table.players()[0].chips, Chips::new(2040));
    }

    #[test]
    fn short_all_in_wins_main_pot_only() {
        let mut table = new_table(&[2000, 2000, 2000, 500]);
        table.start_round(0).unwrap();
        let chips = total_chips(&table);

        table.submit_action(&id(3), Action::AllIn).unwrap();
        table.submit_action(&id(0), Action::Call).unwrap();
        table.submit_action(&id(1), Action::Fold).unwrap();
        let state = table.submit_action(&id(2), Action::Call).unwrap();
        assert_eq!(state.stage, Stage::Flop);
        assert_eq!(state.pot, Chips::new(1510));

        // Seat 0 bets the flop and seat 2 calls, building a side pot.
        table.submit_action(&id(2), Action::Check).unwrap();
        table.submit_action(&id(0), Action::Raise(Chips::new(200))).unwrap();
        table.submit_action(&id(2), Action::Call).unwrap();

        rig_and_check_down(
            &mut table,
            &[(3, "AH AD"), (0, "KC KS"), (2, "7C 2D")],
            "AS KD 8H 4C 3S",
        );

        // Main pot 500 * 3 + 10 from the small blind, side pot 400.
        assert_eq!(table.players()[3].chips, Chips::new(1510));
        assert_eq!(table.players()[0].chips, Chips::new(1300 + 400));
        assert_eq!(total_chips(&table), chips);
        assert_eq!(table.outcome().unwrap().payoffs.len(), 2);
    }

    #[test]
    fn all_in_runs_out_the_board() {
        let mut table = new_table(&[2000, 2000]);
        table.start_round(0).unwrap();

        table.submit_action(&id(1), Action::AllIn).unwrap();
        let state = table.submit_action(&id(0), Action::Call).unwrap();

        assert_eq!(state.stage, Stage::Showdown);
        assert_eq!(state.board.len(), 5);
        assert_eq!(total_chips(&table), Chips::new(4000));
    }

    #[test]
    fn invalid_actions_are_rejected() {
        let mut table = new_table(&[2000; 3]);
        table.start_round(0).unwrap();
        let before = format!("{:?}", table.round_state());

        assert_eq!(
            table.submit_action(&PlayerId::new("nobody"), Action::Fold).unwrap_err(),
            EngineError::UnknownPlayer(PlayerId::new("nobody"))
        );
        assert!(matches!(
            table.submit_action(&id(0), Action::Check),
            Err(EngineError::InvalidAction(_))
        ));
        assert!(matches!(
            table.submit_action(&id(1), Action::Call),
            Err(EngineError::InvalidAction(_))
        ));
        assert_eq!(before, format!("{:?}", table.round_state()));
        assert_eq!(table.start_round(1).unwrap_err(), EngineError::RoundInProgress);
        assert_eq!(table.end_or_continue().unwrap_err(), EngineError::RoundInProgress);
    }

    #[test]
    fn chat_only_for_current_round() {
        let mut table = new_table(&[2000; 3]);
        table.start_round(0).unwrap();
        let round_id = table.round_id();

        assert!(table.set_chat(round_id, &id(1), "Nice".to_string()));
        assert_eq!(table.players()[1].label, ActionLabel::Chat("Nice".to_string()));
        assert_eq!(table.players()[1].bet, Chips::new(10));

        table.submit_action(&id(0), Action::Fold).unwrap();
        table.submit_action(&id(1), Action::Fold).unwrap();
        table.end_or_continue().unwrap();

        assert!(!table.set_chat(round_id, &id(1), "Stale".to_string()));
    }

    #[test]
    fn dealer_rotates_and_game_ends() {
        let mut table = new_table(&[2000, 2000]);
        table.start_round(0).unwrap();
        table.submit_action(&id(1), Action::Fold).unwrap();

        let GameProgress::Continue(state) = table.end_or_continue().unwrap() else {
            panic!("game should continue");
        };
        assert_eq!(state.dealer, 1);
        assert_eq!(state.players[0].bet, Chips::new(10));

        // Play all in until one player is busted.
        loop {
            while let Some(seat) = table.round_state().turn {
                let action = if table.round_state().to_call(seat).is_zero() {
                    Action::AllIn
                } else {
                    Action::Call
                };
                table.submit_action(&id(seat), action).unwrap();
            }

            assert_eq!(total_chips(&table), Chips::new(4000));
            match table.end_or_continue().unwrap() {
                GameProgress::Continue(_) => {}
                GameProgress::GameOver { winner } => {
                    let winner = winner.unwrap();
                    let seat = table.round_state().seat_of(&winner).unwrap();
                    assert_eq!(table.players()[seat].chips, Chips::new(4000));
                    break;
                }
            }
        }
    }

    #[test]
    fn covered_cards_for_viewer() {
        let mut table = new_table(&[2000; 3]);
        let state = table.start_round(0).unwrap().covered_for(&id(0));
        assert!(state.players[0].hand.cards().is_some());
        assert_eq!(state.players[1].hand, PlayerCards::Covered);
        assert_eq!(state.legal_actions(0).len(), 4);
        assert!(state.legal_actions(1).is_empty());
    }
}
