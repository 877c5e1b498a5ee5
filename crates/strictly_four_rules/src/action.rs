//! First-class move records.

use super::Player;
use serde::{Deserialize, Serialize};

/// A move: a player dropping a piece into a column.
///
/// Moves are kept in the game history so a position can be replayed
/// and checked against the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// The 0-based column the piece was dropped into.
    pub column: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, column: usize) -> Self {
        Self { player, column }
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the column of this move.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> column {}", self.player, self.column)
    }
}
