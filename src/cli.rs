//! Command-line interface for ayu_server.

use ayu_server::DEFAULT_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ayu game server with long-poll updates
#[derive(Parser, Debug)]
#[command(name = "ayu_server")]
#[command(about = "Ayu game server with long-poll updates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Hostname to bind the HTTP server on
        #[arg(long)]
        host: Option<String>,

        /// TCP port to bind the HTTP server on
        #[arg(short, long)]
        port: Option<u16>,

        /// Maximum time to block on poll requests (in seconds)
        #[arg(long)]
        poll_delay: Option<u64>,

        /// Directory where game snapshots are stored
        #[arg(long)]
        storage_dir: Option<PathBuf>,

        /// Keep games in memory only
        #[arg(long, conflicts_with = "storage_dir")]
        memory: bool,
    },

    /// Print the starting position
    Board {
        /// Board size (odd, 3 to 19)
        #[arg(short, long, default_value_t = DEFAULT_SIZE)]
        size: usize,
    },

    /// Replay a list of moves and print board, log and score
    Replay {
        /// Board size (odd, 3 to 19)
        #[arg(short, long, default_value_t = DEFAULT_SIZE)]
        size: usize,

        /// Moves in SRC-DST notation, e.g. D9-E9
        moves: Vec<String>,
    },
}
