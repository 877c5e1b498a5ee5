//! Gravity invariant: pieces rest on the floor or on other pieces.

use super::Invariant;
use crate::{Board, Cell};

/// Invariant: no occupied cell sits directly above an empty one.
///
/// Within every column the occupied cells form one contiguous run
/// starting at the bottom row.
pub struct GravityInvariant;

impl Invariant<Board> for GravityInvariant {
    fn holds(board: &Board) -> bool {
        (0..board.cols()).all(|col| {
            (1..board.rows()).all(|row| {
                let above = board.get(row - 1, col);
                let below = board.get(row, col);
                !(matches!(above, Some(Cell::Occupied(_))) && below == Some(Cell::Empty))
            })
        })
    }

    fn description() -> &'static str {
        "Pieces rest on the bottom row or on another piece"
    }
}
