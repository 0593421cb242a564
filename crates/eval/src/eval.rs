// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! The evaluator tallies rank and suit multiplicities of a 2 to 7 cards hand,
//! looks for flushes and straights (the A-2-3-4-5 wheel counts as a five high
//! straight) and picks the best five cards for the strongest category.
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use showdown_cards::{Card, Rank, Suit};

/// The hand category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    /// No pair.
    HighCard = 0,
    /// One pair.
    Pair,
    /// Two pairs.
    TwoPair,
    /// Three cards with the same rank.
    ThreeOfAKind,
    /// Five cards in sequence.
    Straight,
    /// Five cards with the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four cards with the same rank.
    FourOfAKind,
    /// Five cards in sequence with the same suit.
    StraightFlush,
}

impl HandCategory {
    /// The category display name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::Pair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The value of a poker hand.
///
/// The score is the category base offset (`category << 20`) plus the ranks of
/// the five best cards packed in 4 bits each, from the most significant card
/// (the quads rank, the full house trips, the highest pair...) to the last
/// kicker. This resolves ties down to the kickers in every category, so two
/// flushes with the same high card compare on the second card and so on; hands
/// compare equal only when a pot should be split.
///
/// Two values are equal when their scores are equal, the best cards may differ
/// by suit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandValue {
    category: HandCategory,
    score: u32,
    best: Vec<Card>,
}

impl HandValue {
    /// Evaluates a 2 to 7 cards hand.
    ///
    /// Panics if the number of cards is not 2 <= n <= 7.
    pub fn eval(cards: &[Card]) -> HandValue {
        assert!((2..=7).contains(&cards.len()), "2 <= cards <= 7");

        // Sort by rank and suit so that the result does not depend on input order.
        let mut sorted = cards.to_vec();
        sorted.sort_unstable_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));

        let mut rank_counts = [0u8; 15];
        let mut suit_counts = [0u8; 4];
        for card in &sorted {
            rank_counts[card.value() as usize] += 1;
            suit_counts[card.suit() as usize] += 1;
        }

        let flush_suit = Suit::suits().find(|s| suit_counts[*s as usize] >= 5);
        if let Some(suit) = flush_suit {
            let suited = cards_of_suit(&sorted, suit);
            if let Some(best) = find_straight(&suited) {
                return Self::new(HandCategory::StraightFlush, best);
            }
        }

        // Rank groups by multiplicity then rank, e.g. [(3, K), (2, 9), (1, A)].
        let mut groups = Rank::ranks()
            .rev()
            .map(|r| (rank_counts[r as usize], r))
            .filter(|(n, _)| *n > 0)
            .collect::<Vec<_>>();
        groups.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

        let (top_count, top_rank) = groups[0];

        if top_count == 4 {
            let mut best = cards_of_rank(&sorted, top_rank, 4);
            best.extend(kickers(&sorted, &[top_rank], 1));
            return Self::new(HandCategory::FourOfAKind, best);
        }

        if top_count == 3 {
            // With two trips the lower one can make the pair.
            let pair_rank = groups[1..]
                .iter()
                .filter(|(n, _)| *n >= 2)
                .map(|(_, r)| *r)
                .max();

            if let Some(pair_rank) = pair_rank {
                let mut best = cards_of_rank(&sorted, top_rank, 3);
                best.extend(cards_of_rank(&sorted, pair_rank, 2));
                return Self::new(HandCategory::FullHouse, best);
            }
        }

        if let Some(suit) = flush_suit {
            let mut best = cards_of_suit(&sorted, suit);
            best.truncate(5);
            return Self::new(HandCategory::Flush, best);
        }

        if let Some(best) = find_straight(&sorted) {
            return Self::new(HandCategory::Straight, best);
        }

        match top_count {
            3 => {
                let mut best = cards_of_rank(&sorted, top_rank, 3);
                best.extend(kickers(&sorted, &[top_rank], 2));
                Self::new(HandCategory::ThreeOfAKind, best)
            }
            2 if groups.len() > 1 && groups[1].0 == 2 => {
                let second_rank = groups[1].1;
                let mut best = cards_of_rank(&sorted, top_rank, 2);
                best.extend(cards_of_rank(&sorted, second_rank, 2));
                best.extend(kickers(&sorted, &[top_rank, second_rank], 1));
                Self::new(HandCategory::TwoPair, best)
            }
            2 => {
                let mut best = cards_of_rank(&sorted, top_rank, 2);
                best.extend(kickers(&sorted, &[top_rank], 3));
                Self::new(HandCategory::Pair, best)
            }
            _ => {
                sorted.truncate(5);
                Self::new(HandCategory::HighCard, sorted)
            }
        }
    }

    fn new(category: HandCategory, best: Vec<Card>) -> Self {
        let is_wheel = matches!(
            category,
            HandCategory::Straight | HandCategory::StraightFlush
        ) && best[0].rank() == Rank::Five;

        let mut score = (category as u32) << 20;
        for (idx, card) in best.iter().enumerate() {
            // The wheel ace plays low.
            let value = if is_wheel && card.rank() == Rank::Ace {
                1
            } else {
                card.value() as u32
            };

            score |= value << (16 - 4 * idx);
        }

        Self {
            category,
            score,
            best,
        }
    }

    /// The hand category.
    pub fn category(&self) -> HandCategory {
        self.category
    }

    /// The hand score, higher is better.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The best five cards ordered by significance.
    pub fn best(&self) -> &[Card] {
        &self.best
    }
}

impl PartialEq for HandValue {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl Eq for HandValue {}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        for card in &self.best {
            write!(f, " {card}")?;
        }

        Ok(())
    }
}

fn cards_of_suit(sorted: &[Card], suit: Suit) -> Vec<Card> {
    sorted.iter().filter(|c| c.suit() == suit).copied().collect()
}

fn cards_of_rank(sorted: &[Card], rank: Rank, n: usize) -> Vec<Card> {
    sorted
        .iter()
        .filter(|c| c.rank() == rank)
        .take(n)
        .copied()
        .collect()
}

fn kickers(sorted: &[Card], used: &[Rank], n: usize) -> Vec<Card> {
    sorted
        .iter()
        .filter(|c| !used.contains(&c.rank()))
        .take(n)
        .copied()
        .collect()
}

/// Finds the highest five cards straight in cards sorted by descending rank.
fn find_straight(sorted: &[Card]) -> Option<Vec<Card>> {
    let mut run: Vec<Card> = Vec::with_capacity(5);

    for card in sorted {
        match run.last() {
            Some(last) if last.rank() == card.rank() => continue,
            Some(last) if last.value() == card.value() + 1 => run.push(*card),
            _ => {
                run.clear();
                run.push(*card);
            }
        }

        if run.len() == 5 {
            return Some(run);
        }
    }

    // Five to deuce plus an ace is the wheel.
    match sorted.first() {
        Some(ace) if run.len() == 4 && run[0].rank() == Rank::Five && ace.rank() == Rank::Ace => {
            run.push(*ace);
            Some(run)
        }
        _ => None,
    }
}
