//! Offline proposer that picks the first open column.

use super::{MoveProposer, ProposerError, ProposerErrorKind};
use strictly_four_rules::{Board, Player};
use tracing::debug;

/// Deterministic proposer: always the lowest-indexed open column.
///
/// Used when no model is configured.
#[derive(Debug, Clone)]
pub struct FirstOpenColumn {
    name: String,
}

impl FirstOpenColumn {
    /// Creates a new first-open-column proposer.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for FirstOpenColumn {
    fn default() -> Self {
        Self::new("First open column")
    }
}

#[async_trait::async_trait]
impl MoveProposer for FirstOpenColumn {
    async fn propose(&self, board: &Board, player: Player) -> Result<usize, ProposerError> {
        let column = board
            .first_open_column()
            .ok_or_else(|| ProposerError::new(ProposerErrorKind::NoOpenColumn))?;
        debug!(proposer = %self.name, %player, column, "Proposer chose column");
        Ok(column)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_picks_lowest_open_column() {
        let mut board = Board::new(4, 4).unwrap();
        for player in [Player::Human, Player::Ai, Player::Human, Player::Ai] {
            board = board.drop_piece(0, player).unwrap();
        }
        let proposer = FirstOpenColumn::default();
        assert_eq!(proposer.propose(&board, Player::Ai).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_full_board_is_an_error() {
        let board: Board = "XO\nOX".parse().unwrap();
        let err = FirstOpenColumn::default()
            .propose(&board, Player::Ai)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &ProposerErrorKind::NoOpenColumn);
    }
}
