//! Piece balance invariant: players alternate, Human first.

use super::Invariant;
use crate::{Board, Player};

/// Invariant: Human has as many pieces as Ai, or exactly one more.
pub struct PieceBalanceInvariant;

impl Invariant<Board> for PieceBalanceInvariant {
    fn holds(board: &Board) -> bool {
        let human = board.piece_count(Player::Human);
        let ai = board.piece_count(Player::Ai);
        human == ai || human == ai + 1
    }

    fn description() -> &'static str {
        "Players alternate with Human moving first"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_boards_hold() {
        let board = Board::standard();
        assert!(PieceBalanceInvariant::holds(&board));

        let board = board.drop_piece(0, Player::Human).unwrap();
        assert!(PieceBalanceInvariant::holds(&board));

        let board = board.drop_piece(1, Player::Ai).unwrap();
        assert!(PieceBalanceInvariant::holds(&board));
    }

    #[test]
    fn test_ai_ahead_violates() {
        let board = Board::standard().drop_piece(0, Player::Ai).unwrap();
        assert!(!PieceBalanceInvariant::holds(&board));
    }

    #[test]
    fn test_human_two_ahead_violates() {
        let board = Board::standard()
            .drop_piece(0, Player::Human)
            .and_then(|b| b.drop_piece(1, Player::Human))
            .unwrap();
        assert!(!PieceBalanceInvariant::holds(&board));
    }
}
