// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table task.
//!
//! The [TableTask] is the only owner of the round state, actions from the
//! [TableHandle], bot decisions, timers and commentary results are all handled
//! by its loop one at a time.
use anyhow::{Result, bail};
use log::{debug, error, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{ops::Range, sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{self, Instant},
};

use showdown_bot::Strategy;
use showdown_core::{
    Action, Chips, GameProgress, HandOutcome, Player, PlayerId, PlayerKind, RoundId, RoundState, Table,
    TableConfig,
};

use crate::commentator::{
    Commentator, Situation, game_commentary_or_fallback, player_chat_or_fallback,
};

/// Table task configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Blinds.
    pub table: TableConfig,
    /// The bots thinking delay range.
    pub thinking: Range<Duration>,
    /// The pause before dealing the next round.
    pub next_round_pause: Duration,
    /// Seed for the deck and the first dealer, OS randomness if none.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            thinking: Duration::from_secs(1)..Duration::from_secs(2),
            next_round_pause: Duration::from_secs(5),
            seed: None,
        }
    }
}

/// A seat at the table, bots have a strategy.
pub struct Seat {
    /// The seated player.
    pub player: Player,
    /// The bot strategy, none for a human player.
    pub strategy: Option<Box<dyn Strategy>>,
}

impl Seat {
    /// A human seat.
    pub fn human(id: PlayerId, name: impl Into<String>, chips: Chips) -> Self {
        Self {
            player: Player::new(id, name, PlayerKind::Human, chips),
            strategy: None,
        }
    }

    /// A bot seat.
    pub fn bot(id: PlayerId, name: impl Into<String>, chips: Chips, strategy: impl Strategy) -> Self {
        Self {
            player: Player::new(id, name, PlayerKind::Bot, chips),
            strategy: Some(Box::new(strategy)),
        }
    }
}

/// The table status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    /// A round is being played.
    Playing,
    /// The round is settled, waiting for the next one.
    Paused,
    /// Fewer than two players have chips.
    GameOver {
        /// The player left with chips.
        winner: Option<PlayerId>,
    },
}

/// What observers see after every change.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    /// The round state.
    pub state: RoundState,
    /// The table status.
    pub status: TableStatus,
    /// The last settled round.
    pub outcome: Option<HandOutcome>,
    /// The commentary for the last settled round.
    pub commentary: Option<String>,
}

/// Handle to a table task.
#[derive(Debug, Clone)]
pub struct TableHandle {
    commands_tx: mpsc::Sender<TableCommand>,
    snapshot_rx: watch::Receiver<TableSnapshot>,
}

/// Command for the table task.
#[derive(Debug)]
enum TableCommand {
    /// Apply a human player action.
    Action {
        player_id: PlayerId,
        action: Action,
        resp_tx: oneshot::Sender<Result<RoundState>>,
    },
    /// Get the round state.
    State {
        resp_tx: oneshot::Sender<RoundState>,
    },
    /// Stop the task.
    Shutdown { resp_tx: oneshot::Sender<()> },
}

/// A commentary result, tagged with the round it was requested for.
#[derive(Debug)]
enum Commentary {
    Table {
        round_id: RoundId,
        text: String,
    },
    Chat {
        round_id: RoundId,
        player_id: PlayerId,
        text: String,
    },
}

/// The next timed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Idle,
    Thinking {
        round_id: RoundId,
        seat: usize,
        at: Instant,
    },
    NextRound {
        at: Instant,
    },
}

impl Timer {
    fn deadline(&self) -> Option<Instant> {
        match self {
            Timer::Idle => None,
            Timer::Thinking { at, .. } | Timer::NextRound { at } => Some(*at),
        }
    }
}

impl TableHandle {
    /// Spawns a task that plays rounds with the given seats.
    pub fn spawn<C: Commentator>(seats: Vec<Seat>, config: Config, commentator: C) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(128);
        let mut task = TableTask::new(seats, config, Arc::new(commentator), commands_rx);
        let snapshot_rx = task.snapshot_tx.subscribe();

        tokio::spawn(async move {
            if let Err(err) = task.run().await {
                error!("Table error {err}");
            }

            info!("Table task stopped");
        });

        Self {
            commands_tx,
            snapshot_rx,
        }
    }

    /// Applies an action for a human player.
    ///
    /// Returns an error if the action is not legal, the round is unchanged.
    pub async fn submit_action(&self, player_id: &PlayerId, action: Action) -> Result<RoundState> {
        let (resp_tx, resp_rx) = oneshot::channel();

        self.commands_tx
            .send(TableCommand::Action {
                player_id: player_id.clone(),
                action,
                resp_tx,
            })
            .await?;

        resp_rx.await?
    }

    /// Returns the current round state.
    pub async fn round_state(&self) -> Result<RoundState> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::State { resp_tx })
            .await?;
        Ok(resp_rx.await?)
    }

    /// Returns a receiver for the table snapshots.
    pub fn subscribe(&self) -> watch::Receiver<TableSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Stops the table task, pending timers and decisions are dropped.
    pub async fn shutdown(&self) {
        let (resp_tx, resp_rx) = oneshot::channel();
        if self
            .commands_tx
            .send(TableCommand::Shutdown { resp_tx })
            .await
            .is_ok()
        {
            let _ = resp_rx.await;
        }
    }
}

struct TableTask {
    /// The round engine.
    table: Table,
    /// The bots strategies by seat.
    strategies: Vec<Option<Box<dyn Strategy>>>,
    /// Task configuration.
    config: Config,
    /// Randomness for delays, dealer and chat.
    rng: StdRng,
    /// Commentary service.
    commentator: Arc<dyn Commentator>,
    /// Channel for receiving table commands.
    commands_rx: mpsc::Receiver<TableCommand>,
    /// Channels for commentary results.
    commentary_tx: mpsc::UnboundedSender<Commentary>,
    commentary_rx: mpsc::UnboundedReceiver<Commentary>,
    /// Channel for publishing snapshots.
    snapshot_tx: watch::Sender<TableSnapshot>,
    /// The next timed event.
    timer: Timer,
    status: TableStatus,
    commentary: Option<String>,
}

impl TableTask {
    fn new(
        seats: Vec<Seat>,
        config: Config,
        commentator: Arc<dyn Commentator>,
        commands_rx: mpsc::Receiver<TableCommand>,
    ) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let (players, strategies): (Vec<_>, Vec<_>) =
            seats.into_iter().map(|s| (s.player, s.strategy)).unzip();

        let table_rng = StdRng::seed_from_u64(rng.random());
        let table = Table::with_rng(players, config.table, table_rng);
        let (commentary_tx, commentary_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(TableSnapshot {
            state: table.round_state(),
            status: TableStatus::Paused,
            outcome: None,
            commentary: None,
        });

        Self {
            table,
            strategies,
            config,
            rng,
            commentator,
            commands_rx,
            commentary_tx,
            commentary_rx,
            snapshot_tx,
            timer: Timer::Idle,
            status: TableStatus::Paused,
            commentary: None,
        }
    }

    async fn run(&mut self) -> Result<()> {
        let dealer = self.rng.random_range(0..self.strategies.len());
        self.table.start_round(dealer)?;
        self.status = TableStatus::Playing;
        self.update();

        loop {
            let deadline = self.timer.deadline();

            tokio::select! {
                res = self.commands_rx.recv() => match res {
                    Some(TableCommand::Action { player_id, action, resp_tx }) => {
                        let res = self.human_action(&player_id, action);
                        let _ = resp_tx.send(res);
                    }
                    Some(TableCommand::State { resp_tx }) => {
                        let _ = resp_tx.send(self.table.round_state());
                    }
                    Some(TableCommand::Shutdown { resp_tx }) => {
                        let _ = resp_tx.send(());
                        break Ok(());
                    }
                    // All handles dropped.
                    None => break Ok(()),
                },
                Some(commentary) = self.commentary_rx.recv() => {
                    self.on_commentary(commentary);
                }
                _ = sleep_until(deadline) => {
                    self.on_timer()?;
                }
            }
        }
    }

    fn human_action(&mut self, player_id: &PlayerId, action: Action) -> Result<RoundState> {
        let Some(seat) = self.table.players().iter().position(|p| &p.id == player_id) else {
            bail!("Unknown player {player_id}");
        };

        if self.strategies[seat].is_some() {
            bail!("Player {player_id} is a bot");
        }

        let state = self.table.submit_action(player_id, action)?;
        debug!("{} {action}", self.table.players()[seat].name);
        self.update();

        Ok(state)
    }

    /// Called when the thinking delay or the pause elapses.
    fn on_timer(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.timer, Timer::Idle) {
            Timer::Thinking { round_id, seat, .. } => self.bot_action(round_id, seat),
            Timer::NextRound { .. } => {
                self.commentary = None;
                self.status = match self.table.end_or_continue()? {
                    GameProgress::Continue(_) => TableStatus::Playing,
                    GameProgress::GameOver { winner } => TableStatus::GameOver { winner },
                };
                self.update();
            }
            Timer::Idle => {}
        }

        Ok(())
    }

    /// Asks the bot strategy for an action, ignored if the turn has moved.
    fn bot_action(&mut self, round_id: RoundId, seat: usize) {
        let state = self.table.round_state();
        if state.round_id != round_id || state.turn != Some(seat) {
            debug!("Discarding stale decision for seat {seat} round {round_id}");
            return;
        }

        let Some(strategy) = self.strategies[seat].as_mut() else {
            return;
        };

        let player = &state.players[seat];
        let action = strategy.execute(&state.covered_for(&player.id), seat);

        let action = match self.table.submit_action(&player.id, action) {
            Ok(_) => action,
            Err(err) => {
                warn!("{} {action} rejected: {err}", player.name);
                if let Err(err) = self.table.submit_action(&player.id, Action::Fold) {
                    error!("{} fold rejected: {err}", player.name);
                    return;
                }

                Action::Fold
            }
        };

        debug!("{} {action}", player.name);

        let situation = match action {
            Action::Fold => Some(Situation::Fold),
            Action::Raise(_) => Some(Situation::Raise),
            _ => None,
        };

        if let Some(situation) = situation {
            if self.rng.random::<f64>() > 0.8 {
                self.spawn_chat(round_id, player.id.clone(), player.name.clone(), situation);
            }
        }

        self.update();
    }

    /// Schedules the next timed event and publishes a snapshot.
    fn update(&mut self) {
        if self.table.is_round_in_progress() {
            let state = self.table.round_state();
            match state.turn {
                Some(seat) if self.strategies[seat].is_some() => {
                    let scheduled = matches!(
                        self.timer,
                        Timer::Thinking { round_id, seat: s, .. }
                            if round_id == state.round_id && s == seat
                    );

                    if !scheduled {
                        self.timer = Timer::Thinking {
                            round_id: state.round_id,
                            seat,
                            at: Instant::now() + self.thinking_delay(),
                        };
                    }
                }
                // Waiting for a human player.
                _ => self.timer = Timer::Idle,
            }
        } else if self.status == TableStatus::Playing {
            self.spawn_commentary();

            let mut with_chips = self.table.players().iter().filter(|p| !p.chips.is_zero());
            let first = with_chips.next();
            if with_chips.next().is_none() {
                let winner = first.map(|p| p.id.clone());
                info!(
                    "Game over winner {}",
                    winner.as_ref().map(|w| w.as_str()).unwrap_or("none")
                );

                self.status = TableStatus::GameOver { winner };
                self.timer = Timer::Idle;
            } else {
                self.status = TableStatus::Paused;
                self.timer = Timer::NextRound {
                    at: Instant::now() + self.config.next_round_pause,
                };
            }
        }

        self.publish();
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(TableSnapshot {
            state: self.table.round_state(),
            status: self.status.clone(),
            outcome: self.table.outcome().cloned(),
            commentary: self.commentary.clone(),
        });
    }

    fn thinking_delay(&mut self) -> Duration {
        let thinking = self.config.thinking.clone();
        if thinking.is_empty() {
            thinking.start
        } else {
            self.rng.random_range(thinking)
        }
    }

    /// Applies a commentary result if it is still for the current round.
    fn on_commentary(&mut self, commentary: Commentary) {
        match commentary {
            Commentary::Table { round_id, text } => {
                if round_id != self.table.round_id() {
                    debug!("Discarding commentary for round {round_id}");
                    return;
                }

                self.commentary = Some(text);
            }
            Commentary::Chat {
                round_id,
                player_id,
                text,
            } => {
                if !self.table.set_chat(round_id, &player_id, text) {
                    debug!("Discarding chat for {player_id} round {round_id}");
                    return;
                }
            }
        }

        self.publish();
    }

    fn spawn_commentary(&self) {
        let Some(outcome) = self.table.outcome() else {
            return;
        };

        let Some(payoff) = outcome.payoffs.first() else {
            return;
        };

        let round_id = outcome.round_id;
        let pot = outcome.pot;
        let winner = payoff.name.clone();
        let hand = payoff
            .hand
            .as_ref()
            .map(|h| h.category().to_string())
            .unwrap_or_else(|| "everyone folded".to_string());
        let is_human = self
            .table
            .players()
            .iter()
            .any(|p| p.id == payoff.player_id && p.kind == PlayerKind::Human);

        let commentator = self.commentator.clone();
        let commentary_tx = self.commentary_tx.clone();
        tokio::spawn(async move {
            let text =
                game_commentary_or_fallback(commentator.as_ref(), &winner, &hand, pot, is_human)
                    .await;
            let _ = commentary_tx.send(Commentary::Table { round_id, text });
        });
    }

    fn spawn_chat(&self, round_id: RoundId, player_id: PlayerId, name: String, situation: Situation) {
        let commentator = self.commentator.clone();
        let commentary_tx = self.commentary_tx.clone();
        tokio::spawn(async move {
            let text = player_chat_or_fallback(commentator.as_ref(), &name, situation).await;
            let _ = commentary_tx.send(Commentary::Chat {
                round_id,
                player_id,
                text,
            });
        });
    }
}

/// Sleeps until the deadline, forever if there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
