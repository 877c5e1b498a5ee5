//! Strictly Four - terminal front end.
//!
//! Renders the board, turns typed column numbers into column clicks, and
//! lets the turn controller fetch the model's replies.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::{Path, PathBuf};
use strictly_four::{
    Board, ExternalMoveSource, FirstOpenColumn, GameConfig, GameOutcome, LlmClient, LlmProposer,
    MoveProposer, Player, ProposerError, ProposerErrorKind, TurnController, TurnPhase,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "strictly_four.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config, offline } => run_play(config, offline).await,
        Command::Ask {
            board,
            config,
            offline,
        } => run_ask(board, config, offline).await,
    }
}

/// Loads the explicit config, else the default file if present, else defaults.
#[instrument]
fn load_config(path: Option<PathBuf>) -> Result<GameConfig> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => PathBuf::from(DEFAULT_CONFIG),
        None => {
            info!("No config file, using defaults");
            return Ok(GameConfig::default());
        }
    };
    Ok(GameConfig::from_file(&path)?)
}

/// Picks the model proposer, or the offline one when asked or when no key is set.
#[instrument(skip(config))]
fn build_proposer(config: &GameConfig, offline: bool) -> Box<dyn MoveProposer> {
    if offline {
        return Box::new(FirstOpenColumn::default());
    }
    let client = config
        .create_llm_config()
        .map_err(|e| e.message)
        .and_then(|llm_config| LlmClient::new(llm_config).map_err(|e| e.message));
    match client {
        Ok(client) => {
            let name = format!("{} ({})", config.llm_model(), config.llm_provider());
            Box::new(LlmProposer::new(name, client))
        }
        Err(message) => {
            warn!(error = %message, "No model available, playing offline");
            eprintln!("{}; playing against the first-open-column proposer.", message);
            Box::new(FirstOpenColumn::default())
        }
    }
}

fn status_line(phase: TurnPhase, opponent: &str) -> String {
    match phase {
        TurnPhase::HumanToMove => {
            "Your move (X). Column number, r to reset, q to quit.".to_string()
        }
        TurnPhase::ExternalToMove { .. } => format!("{} (O) is thinking...", opponent),
        TurnPhase::Finished(GameOutcome::Won(Player::Human)) => {
            "You win! r to play again, q to quit.".to_string()
        }
        TurnPhase::Finished(GameOutcome::Won(Player::Ai)) => {
            format!("{} wins. r to play again, q to quit.", opponent)
        }
        TurnPhase::Finished(_) => "Draw. r to play again, q to quit.".to_string(),
    }
}

fn render<P: MoveProposer>(controller: &TurnController<P>) {
    println!("\n{}\n", controller.state().board());
    println!("{}", status_line(controller.phase(), controller.proposer().name()));
}

/// Runs the interactive terminal game.
async fn run_play(config_path: Option<PathBuf>, offline: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let proposer = build_proposer(&config, offline);
    let mut controller = TurnController::new(*config.rows(), *config.cols(), proposer)?
        .with_think_delay(config.think_delay())
        .with_proposer_timeout(config.proposer_timeout());

    info!(opponent = %controller.proposer().name(), "Starting game");
    render(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match line.trim() {
            "q" | "quit" => break,
            "r" | "reset" => controller.reset(),
            input => {
                let Ok(column) = input.parse::<usize>() else {
                    let last = controller.state().board().cols() - 1;
                    println!("Type a column number between 0 and {}.", last);
                    continue;
                };
                if !controller.column_clicked(column) {
                    println!("You can't play column {} right now.", column);
                    continue;
                }
                if let TurnPhase::ExternalToMove { .. } = controller.phase() {
                    render(&controller);
                    let applied = controller.play_external_turn().await?;
                    if applied.source == ExternalMoveSource::Fallback {
                        println!("(no usable answer, took the first open column)");
                    }
                    println!("{} played column {}.", controller.proposer().name(), applied.column);
                }
            }
        }
        render(&controller);
    }

    Ok(())
}

/// Asks the proposer once and prints the column that would be played.
async fn run_ask(board_path: PathBuf, config_path: Option<PathBuf>, offline: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let proposer = build_proposer(&config, offline);

    let picture = std::fs::read_to_string(&board_path)
        .with_context(|| format!("Failed to read board from {}", board_path.display()))?;
    let board: Board = picture.parse()?;
    let player = if board.piece_count(Player::Human) > board.piece_count(Player::Ai) {
        Player::Ai
    } else {
        Player::Human
    };

    let limit = config.proposer_timeout();
    let answer = tokio::time::timeout(limit, proposer.propose(&board, player))
        .await
        .unwrap_or_else(|_| Err(ProposerError::new(ProposerErrorKind::Timeout(limit))));
    match answer {
        Ok(column) => println!("{}", column),
        Err(e) => {
            let column = board
                .first_open_column()
                .context("Board is full, nothing to propose")?;
            warn!(error = %e, column, "Proposer failed, using fallback");
            println!("{}", column);
        }
    }
    Ok(())
}
