//! Pure Connect Four game logic.
//!
//! This crate holds everything about the game that does not need I/O:
//! the board and its column-drop placement, win and draw detection,
//! move records, and the invariants a legal board always satisfies.
//!
//! # Example
//!
//! ```
//! use strictly_four_rules::{evaluate, Board, GameOutcome, Player};
//!
//! let board = Board::standard()
//!     .drop_piece(3, Player::Human)?
//!     .drop_piece(3, Player::Ai)?;
//! assert_eq!(evaluate(&board), GameOutcome::InProgress);
//! # Ok::<(), strictly_four_rules::BoardError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
pub mod invariants;
pub mod rules;
mod types;

pub use action::Move;
pub use board::{Board, BoardError, DEFAULT_COLS, DEFAULT_ROWS, WIN_LENGTH};
pub use invariants::{
    BoardInvariants, GravityInvariant, Invariant, InvariantSet, InvariantViolation,
    PieceBalanceInvariant,
};
pub use rules::{
    Direction, WinningLine, check_winner, evaluate, find_winning_line, is_draw, is_full,
};
pub use types::{Cell, GameOutcome, Player};
