//! Command-line interface for strictly_four.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Four - Connect Four against an LLM opponent
#[derive(Parser, Debug)]
#[command(name = "strictly_four")]
#[command(about = "Connect Four against an LLM opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Path to game config (TOML). Defaults to strictly_four.toml if present.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Play against the first-open-column proposer instead of a model
        #[arg(long)]
        offline: bool,
    },

    /// Ask the proposer for a single move on a board picture
    Ask {
        /// File holding the board picture ('.', 'X', 'O'; top row first)
        #[arg(short, long)]
        board: PathBuf,

        /// Path to game config (TOML). Defaults to strictly_four.toml if present.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the first-open-column proposer instead of a model
        #[arg(long)]
        offline: bool,
    },
}
