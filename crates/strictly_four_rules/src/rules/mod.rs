//! Game rules for Connect Four.
//!
//! Pure functions over a [`Board`](crate::Board). They accept any raw
//! board, including hand-built ones that no legal game could reach,
//! and never panic on small boards.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{Direction, WinningLine, check_winner, find_winning_line};

use crate::{Board, GameOutcome};
use tracing::instrument;

/// Evaluates a board: the first winning line found, else a draw if
/// the board is full, else in progress.
#[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
pub fn evaluate(board: &Board) -> GameOutcome {
    if let Some(player) = check_winner(board) {
        GameOutcome::Won(player)
    } else if is_full(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::standard()), GameOutcome::InProgress);
    }

    #[test]
    fn test_win_takes_priority_over_full_board() {
        let board: Board = "\
XXXX
OOXO
XXOX
OOXO"
            .parse()
            .unwrap();
        assert!(is_full(&board));
        assert_eq!(evaluate(&board), GameOutcome::Won(Player::Human));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board: Board = "\
XXOO
OOXX
XXOO
OOXX"
            .parse()
            .unwrap();
        assert_eq!(evaluate(&board), GameOutcome::Draw);
    }
}
