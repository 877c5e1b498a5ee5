//! Strictly Four library - Connect Four against an untrusted model.
//!
//! The rules live in [`strictly_four_rules`]; this crate adds the turn
//! state machine and the adapters that fetch the opponent's moves.
//!
//! # Architecture
//!
//! - **Turn**: immutable [`TurnState`] transitions and the [`TurnController`]
//!   that owns them
//! - **Proposer**: the [`MoveProposer`] seam, an LLM-backed implementation
//!   and a deterministic offline one
//! - **LLM client**: Gemini, OpenAI and Anthropic behind one call
//! - **Config**: TOML game configuration and API key lookup
//!
//! # Example
//!
//! ```no_run
//! use strictly_four::{FirstOpenColumn, TurnController, TurnPhase};
//!
//! # async fn example() -> Result<(), strictly_four::TurnError> {
//! let mut controller = TurnController::standard(FirstOpenColumn::default());
//! controller.play_round(3).await?;
//! assert_eq!(controller.phase(), TurnPhase::HumanToMove);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod llm_client;
pub mod proposer;
mod turn;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Proposers
pub use proposer::{
    FirstOpenColumn, LlmProposer, MoveProposer, ProposerError, ProposerErrorKind, parse_column,
    validate_column,
};

// Crate-level exports - Turn handling
pub use turn::{
    DEFAULT_PROPOSER_TIMEOUT, EXTERNAL, ExternalMove, ExternalMoveSource, HUMAN, PendingTurn,
    TurnController, TurnError, TurnPhase, TurnState,
};

// Crate-level exports - Game rules
pub use strictly_four_rules::{Board, BoardError, Cell, GameOutcome, Move, Player, evaluate};
