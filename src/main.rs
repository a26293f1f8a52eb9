//! Ultimate Tic-Tac-Toe - Unified CLI
//!
//! Drives the engine and advisor for demos and batch simulation.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ultimate_ttt::{
    choose_move, play_ai_after, Game, GameSession, GameStatus, NullSink, Player, SeatKind,
    Strategy,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::SelfPlay {
            delay_ms,
            x_strategy,
            o_strategy,
        } => run_self_play(delay_ms, x_strategy.into(), o_strategy.into()).await,
        Command::Simulate {
            games,
            x_strategy,
            o_strategy,
        } => run_simulate(games, x_strategy.into(), o_strategy.into()),
    }
}

/// Plays one paced game between two computer seats, printing the
/// board after every move.
async fn run_self_play(delay_ms: u64, x: Strategy, o: Strategy) -> Result<()> {
    info!(?x, ?o, delay_ms, "Starting self-play game");

    let session = Arc::new(Mutex::new(GameSession::new("self-play".to_string())));
    {
        let mut guard = session.lock().expect("session mutex poisoned");
        guard.register_player(
            "computer-x".to_string(),
            "Computer X".to_string(),
            SeatKind::Computer,
        )?;
        guard.register_player(
            "computer-o".to_string(),
            "Computer O".to_string(),
            SeatKind::Computer,
        )?;
    }
    let sink = NullSink;

    loop {
        let (status, mark) = {
            let guard = session.lock().expect("session mutex poisoned");
            println!("{}", guard.game().board().display());
            (guard.game().status(), guard.game().to_move())
        };
        match status {
            GameStatus::InProgress => {}
            GameStatus::Won(player) => {
                println!("Winner: {player}");
                break;
            }
            GameStatus::Drawn => {
                println!("Draw");
                break;
            }
        }

        let strategy = if mark == Player::X { x } else { o };
        let report = play_ai_after(
            Arc::clone(&session),
            mark,
            strategy,
            Duration::from_millis(delay_ms),
            &sink,
        )
        .await?;
        if report.is_none() {
            // Nothing else mutates the session, so an abandoned move
            // means the game ended.
            break;
        }
    }

    Ok(())
}

/// Plays a headless batch of games and tallies the results.
fn run_simulate(games: u32, x: Strategy, o: Strategy) -> Result<()> {
    info!(games, ?x, ?o, "Starting simulation");

    let mut x_wins = 0u32;
    let mut o_wins = 0u32;
    let mut draws = 0u32;

    for _ in 0..games {
        let mut game = Game::new();
        while !game.status().is_over() {
            let mark = game.to_move();
            let strategy = if mark == Player::X { x } else { o };
            let mv = choose_move(&game, mark, strategy)?;
            game.apply_move(mv)?;
        }
        match game.status() {
            GameStatus::Won(Player::X) => x_wins += 1,
            GameStatus::Won(Player::O) => o_wins += 1,
            GameStatus::Drawn => draws += 1,
            GameStatus::InProgress => unreachable!("loop exits only on a decided game"),
        }
    }

    info!(x_wins, o_wins, draws, "Simulation complete");
    println!("games: {games}  X wins: {x_wins}  O wins: {o_wins}  draws: {draws}");
    Ok(())
}
