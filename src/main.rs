//! chain-capture: a chain-reaction capture board game.
//!
//! ## Usage
//!
//! - `chain-capture` - Computer self-play demo
//! - `chain-capture console` - Play over a line-oriented text console
//! - `chain-capture demo` - Computer self-play demo

use std::io;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chain_capture::board::Color;
use chain_capture::console::Console;
use chain_capture::constants::DEFAULT_SIZE;
use chain_capture::difficulty::Difficulty;
use chain_capture::game::{Game, GameConfig, MoveOutcome, PlayerSpec, Status};

/// chain-capture: place tokens, overflow, and take over your neighbors
#[derive(Parser)]
#[command(name = "chain-capture")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter (e.g. `debug`, `chain_capture=trace`); `RUST_LOG` wins when set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    setup: Setup,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct Setup {
    /// Board side length
    #[arg(long, global = true, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Number of players (2 to 5)
    #[arg(long, global = true, default_value_t = 2)]
    players: usize,

    /// Computer difficulty per seat (repeatable: easy, medium, hard)
    #[arg(long = "computer", global = true)]
    computers: Vec<Difficulty>,

    /// Seed for reproducible computer play
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play over stdin/stdout. Seat 0 is human; `--computer` fills the next seats
    Console,
    /// Let computer players play a whole game against each other
    Demo {
        /// Stop after this many moves
        #[arg(long, default_value_t = 500)]
        max_moves: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Some(Commands::Console) => run_console(&cli.setup),
        Some(Commands::Demo { max_moves }) => run_demo(&cli.setup, max_moves),
        None => run_demo(&cli.setup, 500),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter: {level}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn config(setup: &Setup) -> GameConfig {
    GameConfig {
        board_size: setup.size,
        seed: setup.seed,
    }
}

fn run_console(setup: &Setup) -> Result<()> {
    let specs = PlayerSpec::roster(setup.players)
        .into_iter()
        .enumerate()
        .map(|(seat, spec)| match seat.checked_sub(1).and_then(|i| setup.computers.get(i)) {
            Some(&difficulty) => PlayerSpec::computer("", spec.color, difficulty),
            None => spec,
        })
        .collect();
    let game = Game::with_config(specs, config(setup)).context("could not set up the game")?;
    let mut console = Console::new(game);
    console
        .run(io::stdin().lock(), io::stdout())
        .context("console I/O failed")
}

fn run_demo(setup: &Setup, max_moves: usize) -> Result<()> {
    let difficulties = if setup.computers.is_empty() {
        vec![Difficulty::default()]
    } else {
        setup.computers.clone()
    };
    let specs = Color::PALETTE
        .into_iter()
        .take(setup.players)
        .zip(difficulties.iter().cycle())
        .map(|(color, &difficulty)| PlayerSpec::computer("", color, difficulty))
        .collect();
    let mut game = Game::with_config(specs, config(setup)).context("could not set up the game")?;

    println!("chain-capture demo: {} computer players\n", game.players().len());
    for player in game.players() {
        println!(
            "  {} ({}) plays {}",
            player.name,
            player.color,
            player.difficulty.unwrap_or_default()
        );
    }
    println!();

    let records = game.play_computer_turns(max_moves)?;
    for record in &records {
        let (row, col) = record.point;
        match &record.outcome {
            MoveOutcome::Exploded(steps) | MoveOutcome::Won { steps, .. } if !steps.is_empty() => {
                println!("{} -> ({row}, {col}), {} explosions", record.player, steps.len());
            }
            _ => println!("{} -> ({row}, {col})", record.player),
        }
    }

    println!("\n{}", game.board());
    match (game.status(), game.winner()) {
        (Status::Finished, Some(victory)) => {
            info!(moves = game.move_count(), "demo finished");
            println!("{} wins with {} after {} moves", victory.winner, victory.color, game.move_count());
        }
        _ => println!("no winner after {} moves", game.move_count()),
    }
    Ok(())
}
