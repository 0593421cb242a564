// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown CLI, plays Texas Hold'em against bots in the terminal.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Result, bail};
use clap::Parser;
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use std::time::Duration;

use showdown_table::{
    CannedCommentator, Config, Seat, TableHandle,
    bot::{self, BaselineStrategy},
    core::{Chips, PlayerId, TableConfig},
};

pub mod terminal;

#[derive(Debug, Parser)]
struct Cli {
    /// Number of bots at the table.
    #[clap(long, short, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=7))]
    bots: u8,
    /// The chips each player starts with.
    #[clap(long, short, default_value_t = 2_000)]
    chips: u32,
    /// The small blind.
    #[clap(long, default_value_t = 10)]
    small_blind: u32,
    /// The big blind.
    #[clap(long, default_value_t = 20)]
    big_blind: u32,
    /// Your name at the table.
    #[clap(long, short, default_value = "You")]
    name: String,
    /// Watch the bots play without taking a seat.
    #[clap(long, short)]
    watch: bool,
    /// No bots thinking delay and a short pause between rounds.
    #[clap(long, short)]
    fast: bool,
    /// Seed for a repeatable game.
    #[clap(long, short)]
    seed: Option<u64>,
    /// Enable debug logs.
    #[clap(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_target(false)
        .format_timestamp_millis()
        .init();

    if cli.small_blind == 0 || cli.big_blind < cli.small_blind {
        bail!("Invalid blinds {}/{}", cli.small_blind, cli.big_blind);
    }

    if cli.chips < cli.big_blind {
        bail!("Starting chips must cover the big blind");
    }

    if cli.watch && cli.bots < 2 {
        bail!("Watching needs at least 2 bots");
    }

    let chips = Chips::new(cli.chips);
    let mut seats = Vec::with_capacity(cli.bots as usize + 1);

    let human = (!cli.watch).then(|| PlayerId::new("human"));
    if let Some(id) = &human {
        seats.push(Seat::human(id.clone(), cli.name.clone(), chips));
    }

    for idx in 0..cli.bots as usize {
        let strategy = match cli.seed {
            Some(seed) => {
                let rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64 + 1));
                BaselineStrategy::with_rng(rng)
            }
            None => BaselineStrategy::new(),
        };

        seats.push(Seat::bot(
            PlayerId::new(format!("bot{idx}")),
            bot::nickname(idx),
            chips,
            strategy,
        ));
    }

    let mut config = Config {
        table: TableConfig {
            small_blind: Chips::new(cli.small_blind),
            big_blind: Chips::new(cli.big_blind),
        },
        seed: cli.seed,
        ..Config::default()
    };

    if cli.fast {
        config.thinking = Duration::ZERO..Duration::ZERO;
        config.next_round_pause = Duration::from_millis(500);
    }

    info!(
        "Starting table with {} players, blinds {}/{}",
        seats.len(),
        config.table.small_blind,
        config.table.big_blind
    );

    let handle = TableHandle::spawn(seats, config, CannedCommentator);
    terminal::run(handle, human).await
}
