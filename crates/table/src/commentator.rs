// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table commentary.
//!
//! Commentary is cosmetic: a [Commentator] produces text for the table after a
//! round is settled and chat lines for the bots, the results never change the
//! game and failures are replaced with fixed fallback lines.
use anyhow::{Result, bail};
use async_trait::async_trait;
use log::warn;
use rand::Rng;
use std::fmt;

use showdown_core::Chips;

/// The situation a bot chats about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Situation {
    /// The bot folded.
    Fold,
    /// The bot raised.
    Raise,
    /// The bot won the pot.
    Win,
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Situation::Fold => write!(f, "fold"),
            Situation::Raise => write!(f, "raise"),
            Situation::Win => write!(f, "win"),
        }
    }
}

/// Produces commentary and chat text.
#[async_trait]
pub trait Commentator: Send + Sync + 'static {
    /// A comment on the winner of a round.
    async fn game_commentary(
        &self,
        winner: &str,
        hand: &str,
        pot: Chips,
        is_human: bool,
    ) -> Result<String>;

    /// A short chat line from a bot.
    async fn player_chat(&self, actor: &str, situation: Situation) -> Result<String>;
}

/// Returns the game commentary or the fallback line if the commentator fails.
pub async fn game_commentary_or_fallback(
    commentator: &dyn Commentator,
    winner: &str,
    hand: &str,
    pot: Chips,
    is_human: bool,
) -> String {
    match commentator
        .game_commentary(winner, hand, pot, is_human)
        .await
    {
        Ok(text) => text,
        Err(err) => {
            warn!("Game commentary failed: {err}");
            format!("Congratulations {winner}, you won the pot!")
        }
    }
}

/// Returns the chat line or the fallback line if the commentator fails.
pub async fn player_chat_or_fallback(
    commentator: &dyn Commentator,
    actor: &str,
    situation: Situation,
) -> String {
    match commentator.player_chat(actor, situation).await {
        Ok(text) => text,
        Err(err) => {
            warn!("Chat for {actor} failed: {err}");
            "Next hand.".to_string()
        }
    }
}

/// A commentator that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCommentator;

#[async_trait]
impl Commentator for OfflineCommentator {
    async fn game_commentary(&self, _: &str, _: &str, _: Chips, _: bool) -> Result<String> {
        bail!("commentator offline")
    }

    async fn player_chat(&self, _: &str, _: Situation) -> Result<String> {
        bail!("commentator offline")
    }
}

static HUMAN_WIN_LINES: &[&str] = &[
    "Well played {winner}, {pot} chips with {hand}!",
    "{winner} takes down {pot} with {hand}, the bots are worried.",
    "Great read {winner}, {hand} wins {pot}.",
];

static BOT_WIN_LINES: &[&str] = &[
    "{winner} scoops {pot} with {hand}, the machines are learning.",
    "Beep boop, {winner} wins {pot} with {hand}.",
    "{winner} collects {pot}, {hand} was enough.",
];

static FOLD_LINES: &[&str] = &["Not this time.", "I'll get you next hand.", "Too rich for me."];

static RAISE_LINES: &[&str] = &["Let's make it interesting.", "Pay to see.", "Feeling lucky?"];

static WIN_LINES: &[&str] = &["Ship it!", "Thanks for the chips.", "Read you like a book."];

/// A commentator that picks from built in lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedCommentator;

impl CannedCommentator {
    fn pick(lines: &[&'static str]) -> &'static str {
        let idx = rand::rng().random_range(0..lines.len());
        lines[idx]
    }
}

#[async_trait]
impl Commentator for CannedCommentator {
    async fn game_commentary(
        &self,
        winner: &str,
        hand: &str,
        pot: Chips,
        is_human: bool,
    ) -> Result<String> {
        let line = if is_human {
            Self::pick(HUMAN_WIN_LINES)
        } else {
            Self::pick(BOT_WIN_LINES)
        };

        Ok(line
            .replace("{winner}", winner)
            .replace("{hand}", hand)
            .replace("{pot}", &pot.to_string()))
    }

    async fn player_chat(&self, _actor: &str, situation: Situation) -> Result<String> {
        let line = match situation {
            Situation::Fold => Self::pick(FOLD_LINES),
            Situation::Raise => Self::pick(RAISE_LINES),
            Situation::Win => Self::pick(WIN_LINES),
        };

        Ok(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_uses_fallbacks() {
        let text =
            game_commentary_or_fallback(&OfflineCommentator, "Alice", "Flush", Chips::new(100), true)
                .await;
        assert_eq!(text, "Congratulations Alice, you won the pot!");

        let text = player_chat_or_fallback(&OfflineCommentator, "Bob", Situation::Raise).await;
        assert_eq!(text, "Next hand.");
    }

    #[tokio::test]
    async fn canned_lines() {
        let text = CannedCommentator
            .game_commentary("Alice", "Flush", Chips::new(1_200), false)
            .await
            .unwrap();
        assert!(text.contains("Alice"));
        assert!(!text.contains('{'));

        let text = CannedCommentator
            .player_chat("Bob", Situation::Fold)
            .await
            .unwrap();
        assert!(FOLD_LINES.contains(&text.as_str()));
    }
}
