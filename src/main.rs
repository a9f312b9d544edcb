//! Ayu server - command-line entry point.
//!
//! Runs the HTTP game server or inspects games offline.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use ayu_server::{
    ConfigOverrides, FileStorage, GameState, MemoryStorage, Move, ServerConfig, SessionRegistry,
    StorageBackend, SystemClock,
};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

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
        Command::Serve {
            config,
            host,
            port,
            poll_delay,
            storage_dir,
            memory,
        } => {
            let overrides = ConfigOverrides::new(host, port, poll_delay, storage_dir, memory);
            run_server(config, overrides).await
        }
        Command::Board { size } => show_board(size),
        Command::Replay { size, moves } => replay(size, &moves),
    }
}

/// Run the HTTP game server
#[instrument(skip_all)]
async fn run_server(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Result<()> {
    let config = match config_path {
        Some(path) => ServerConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    }
    .with_overrides(overrides);

    let storage: Arc<dyn StorageBackend> = match config.storage_dir() {
        Some(dir) => {
            info!(dir = %dir.display(), "Using file storage");
            Arc::new(FileStorage::new(dir)?)
        }
        None => {
            info!("Using in-memory storage, games are lost on exit");
            Arc::new(MemoryStorage::new())
        }
    };

    let registry = Arc::new(SessionRegistry::new(storage, Arc::new(SystemClock)));
    info!(
        addr = %config.bind_address(),
        poll_delay_secs = config.poll_delay_secs(),
        "Starting Ayu server"
    );
    ayu_server::serve(&config, registry).await
}

/// Print the starting position
fn show_board(size: usize) -> Result<()> {
    let game = GameState::new(size)?;
    print!("{}", game.board());
    Ok(())
}

/// Replay moves and print the resulting position
#[instrument(skip(moves), fields(count = moves.len()))]
fn replay(size: usize, moves: &[String]) -> Result<()> {
    let moves = moves
        .iter()
        .map(|text| Move::parse(text, size))
        .collect::<Result<Vec<_>, _>>()?;
    let game = GameState::replay(size, moves)?;

    print!("{}", game.board());
    println!();
    print!("{}", game.render_log());
    let [white, black] = game.score();
    if game.is_terminal() {
        println!("Game over. White {} - Black {}", white, black);
    } else {
        println!("{:?} to move", game.player());
    }
    Ok(())
}
