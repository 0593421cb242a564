// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Terminal I/O.
use anyhow::Result;
use crossterm::{
    cursor, execute, queue,
    style::{self, StyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    signal,
};

use showdown_table::{
    TableHandle, TableSnapshot, TableStatus,
    core::{Action, Card, Chips, PlayerCards, PlayerId, RoundState, Suit},
};

/// Runs the terminal loop until the game ends, the user quits or Ctrl-c.
pub async fn run(handle: TableHandle, human: Option<PlayerId>) -> Result<()> {
    let mut stdout = io::stdout();
    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let snapshot = snapshots.borrow_and_update().clone();
    print_snapshot(&mut stdout, &snapshot, human.as_ref())?;

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => break,
            res = snapshots.changed() => {
                if res.is_err() {
                    break;
                }

                let snapshot = snapshots.borrow_and_update().clone();
                print_snapshot(&mut stdout, &snapshot, human.as_ref())?;

                if matches!(snapshot.status, TableStatus::GameOver { .. }) {
                    break;
                }
            }
            res = lines.next_line(), if human.is_some() => {
                let Some(line) = res? else {
                    break;
                };

                let line = line.trim();
                if line.is_empty() {
                    continue;
                } else if matches!(line, "q" | "quit") {
                    break;
                }

                let Some(player_id) = &human else {
                    continue;
                };

                let res = match line.parse::<Action>() {
                    Ok(action) => handle.submit_action(player_id, action).await.map(|_| ()),
                    Err(err) => Err(err.into()),
                };

                if let Err(err) = res {
                    queue!(
                        stdout,
                        style::PrintStyledContent(format!("{err}\n").red())
                    )?;
                    stdout.flush()?;
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn print_snapshot(
    w: &mut impl Write,
    snapshot: &TableSnapshot,
    viewer: Option<&PlayerId>,
) -> Result<()> {
    execute!(w, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    // Spectators see all the cards.
    let state = match viewer {
        Some(viewer) => snapshot.state.covered_for(viewer),
        None => snapshot.state.clone(),
    };

    queue!(
        w,
        style::PrintStyledContent(
            format!("Round {} {}  Pot {}\n", state.round_id, state.stage, state.pot).bold()
        ),
        style::Print("Board: ")
    )?;

    for card in &state.board {
        queue!(w, style::PrintStyledContent(card_text(card)), style::Print(" "))?;
    }

    queue!(w, style::Print("\n\n"))?;

    for seat in 0..state.players.len() {
        print_player(w, &state, seat)?;
    }

    queue!(w, style::Print("\n"))?;

    match &snapshot.status {
        TableStatus::Playing => {}
        TableStatus::Paused => {
            if let Some(outcome) = &snapshot.outcome {
                for payoff in &outcome.payoffs {
                    let hand = payoff
                        .hand
                        .as_ref()
                        .map(|h| format!(" with {}", h.category()))
                        .unwrap_or_default();
                    let text = format!("{} wins {}{hand}\n", payoff.name, payoff.chips);
                    queue!(w, style::PrintStyledContent(text.yellow()))?;
                }
            }
        }
        TableStatus::GameOver { winner } => {
            let name = winner
                .as_ref()
                .and_then(|id| state.seat_of(id))
                .map(|seat| state.players[seat].name.as_str())
                .unwrap_or("nobody");
            let text = format!("Game over, the winner is {name}\n");
            queue!(w, style::PrintStyledContent(text.bold().yellow()))?;
        }
    }

    if let Some(commentary) = &snapshot.commentary {
        queue!(w, style::PrintStyledContent(format!("{commentary}\n").italic()))?;
    }

    if let Some(seat) = viewer.and_then(|v| state.seat_of(v)) {
        if state.turn == Some(seat) {
            let text = format!("Your turn: {} (q to quit)\n> ", action_hints(&state, seat));
            queue!(w, style::PrintStyledContent(text.green()))?;
        }
    }

    w.flush()?;

    Ok(())
}

fn print_player(w: &mut impl Write, state: &RoundState, seat: usize) -> Result<()> {
    let p = &state.players[seat];

    let marker = if state.turn == Some(seat) {
        ">"
    } else if state.dealer == seat {
        "D"
    } else {
        " "
    };

    let bet = if p.bet > Chips::ZERO {
        p.bet.to_string()
    } else {
        String::default()
    };

    let text = format!(
        "{marker} {:<12.12}|{:>8}|{:>7}|{:<12.12}| ",
        p.name,
        p.chips.to_string(),
        bet,
        p.label.to_string(),
    );

    queue!(w, style::PrintStyledContent(text.dark_green()))?;

    match p.hand {
        PlayerCards::None => {}
        PlayerCards::Covered => queue!(w, style::Print("▒▒ ▒▒"))?,
        PlayerCards::Cards(c1, c2) => queue!(
            w,
            style::PrintStyledContent(card_text(&c1)),
            style::Print(" "),
            style::PrintStyledContent(card_text(&c2))
        )?,
    }

    queue!(w, style::Print("\n"))?;

    Ok(())
}

fn card_text(card: &Card) -> StyledContent<String> {
    match card.suit() {
        Suit::Hearts | Suit::Diamonds => card.symbol().red(),
        Suit::Clubs | Suit::Spades => card.symbol().white(),
    }
}

/// Describes the actions a player can type.
fn action_hints(state: &RoundState, seat: usize) -> String {
    state
        .legal_actions(seat)
        .into_iter()
        .map(|action| match action {
            Action::Call => format!("call {}", state.to_call(seat)),
            Action::Raise(min) => format!("raise <{min}+>"),
            action => action.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
