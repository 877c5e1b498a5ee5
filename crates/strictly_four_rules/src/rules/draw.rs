//! Draw detection logic.

use crate::Board;
use tracing::instrument;

/// Checks if the board is full (all cells occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// A full board with no four-in-a-row.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && super::check_winner(board).is_none()
}
