//! Move proposers: where the opponent's moves come from.
//!
//! A proposer is an untrusted oracle. Whatever it answers, the turn
//! controller re-validates the column and falls back to the first open
//! column, so a misbehaving proposer can slow the game down but never
//! stall or corrupt it.

mod error;
mod first_open;
mod llm;

pub use error::{ProposerError, ProposerErrorKind};
pub use first_open::FirstOpenColumn;
pub use llm::{LlmProposer, parse_column};

use strictly_four_rules::{Board, Player};
use tracing::instrument;

/// Trait for anything that can suggest a column to play.
#[async_trait::async_trait]
pub trait MoveProposer: Send + Sync {
    /// Proposes a column for `player` on `board`.
    ///
    /// Implementations must only return columns that passed
    /// [`validate_column`].
    async fn propose(&self, board: &Board, player: Player) -> Result<usize, ProposerError>;

    /// Returns the proposer's display name.
    fn name(&self) -> &str;
}

#[async_trait::async_trait]
impl<P: MoveProposer + ?Sized> MoveProposer for Box<P> {
    async fn propose(&self, board: &Board, player: Player) -> Result<usize, ProposerError> {
        (**self).propose(board, player).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Checks a raw proposed column against the board.
///
/// Rejects negative, out-of-range, and full columns.
#[instrument(skip(board), fields(cols = board.cols()))]
pub fn validate_column(board: &Board, raw: i64) -> Result<usize, ProposerError> {
    let column = usize::try_from(raw).map_err(|_| {
        ProposerError::new(ProposerErrorKind::InvalidColumn {
            column: raw,
            reason: "negative column".to_string(),
        })
    })?;
    if column >= board.cols() {
        return Err(ProposerError::new(ProposerErrorKind::InvalidColumn {
            column: raw,
            reason: format!("board has {} columns", board.cols()),
        }));
    }
    if board.is_column_full(column) {
        return Err(ProposerError::new(ProposerErrorKind::InvalidColumn {
            column: raw,
            reason: "column is full".to_string(),
        }));
    }
    Ok(column)
}
