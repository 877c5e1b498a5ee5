//! Immutable turn state and its transitions.
//!
//! Every transition takes `&self` and returns the next state, so a
//! rejected move can never leave a half-applied change behind.

use crate::proposer::ProposerError;
use serde::Serialize;
use strictly_four_rules::{
    Board, BoardError, BoardInvariants, GameOutcome, InvariantSet, Move, Player, evaluate,
};
use tracing::{debug, info, instrument, warn};

/// The player who moves first and answers `column_clicked` events.
pub const HUMAN: Player = Player::Human;
/// The player whose moves come from the proposer.
pub const EXTERNAL: Player = Player::Ai;

/// Reason a move or transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TurnError {
    /// Column index outside the board.
    #[display("Column {column} is out of range (board has {cols} columns)")]
    ColumnOutOfRange {
        /// Offending column.
        column: usize,
        /// Column count of the board.
        cols: usize,
    },

    /// Column has no room left.
    #[display("Column {_0} is full")]
    ColumnFull(usize),

    /// The other side is to move, or its move is still being computed.
    #[display("It is not your turn")]
    NotYourTurn,

    /// The game already has an outcome; only a reset continues.
    #[display("Game is already over: {_0}")]
    GameOver(GameOutcome),

    /// A pending turn ticket from an earlier position or game.
    #[display("Pending turn no longer matches the game")]
    StaleTurn,

    /// The board could not be created.
    #[display("Invalid board: {_0}")]
    InvalidBoard(BoardError),
}

impl std::error::Error for TurnError {}

impl From<BoardError> for TurnError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::ColumnOutOfRange { column, cols } => {
                TurnError::ColumnOutOfRange { column, cols }
            }
            BoardError::ColumnFull(column) => TurnError::ColumnFull(column),
            other => TurnError::InvalidBoard(other),
        }
    }
}

/// Where the game stands, derived from a [`TurnState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnPhase {
    /// Waiting for the human's column.
    HumanToMove,
    /// The external side is to move; `pending` once its proposal was requested.
    ExternalToMove {
        /// A proposal is in flight.
        pending: bool,
    },
    /// Terminal until reset.
    Finished(GameOutcome),
}

/// How the external side's column was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum ExternalMoveSource {
    /// The proposer's answer was playable and used as is.
    Proposer,
    /// The proposer failed or answered badly; the first open column was played.
    Fallback,
}

/// An external move as applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExternalMove {
    /// Column the piece went into.
    pub column: usize,
    /// Whether the proposer's column or the fallback was used.
    pub source: ExternalMoveSource,
}

/// Complete turn state.
///
/// Read-only for renderers: board, side to move, outcome, and whether an
/// external proposal is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnState {
    board: Board,
    to_move: Player,
    outcome: GameOutcome,
    awaiting_external_move: bool,
    history: Vec<Move>,
}

impl TurnState {
    /// Creates a fresh game on an empty `rows` x `cols` board.
    #[instrument]
    pub fn new(rows: usize, cols: usize) -> Result<Self, TurnError> {
        Ok(Self::from_empty(Board::new(rows, cols)?))
    }

    /// Creates a fresh game on a standard 6x7 board.
    pub fn standard() -> Self {
        Self::from_empty(Board::standard())
    }

    /// Starts a game on `board`, which the caller guarantees is empty.
    pub(crate) fn from_empty(board: Board) -> Self {
        Self {
            board,
            to_move: HUMAN,
            outcome: GameOutcome::InProgress,
            awaiting_external_move: false,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the game outcome so far.
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Returns true while an external proposal is in flight.
    pub fn awaiting_external_move(&self) -> bool {
        self.awaiting_external_move
    }

    /// Returns every move applied so far, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Derives the state machine phase.
    pub fn phase(&self) -> TurnPhase {
        if self.outcome.is_over() {
            TurnPhase::Finished(self.outcome)
        } else if self.to_move == HUMAN {
            TurnPhase::HumanToMove
        } else {
            TurnPhase::ExternalToMove {
                pending: self.awaiting_external_move,
            }
        }
    }

    fn ensure_in_progress(&self) -> Result<(), TurnError> {
        if self.outcome.is_over() {
            return Err(TurnError::GameOver(self.outcome));
        }
        Ok(())
    }

    /// Drops the human's piece into `column`.
    ///
    /// Fails without changing anything when the game is over, the external
    /// side is to move, or the column cannot take a piece.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn submit_move(&self, column: usize) -> Result<TurnState, TurnError> {
        self.ensure_in_progress()?;
        if self.to_move != HUMAN || self.awaiting_external_move {
            return Err(TurnError::NotYourTurn);
        }
        let board = self.board.drop_piece(column, HUMAN)?;
        Ok(self.advance(Move::new(HUMAN, column), board))
    }

    /// Marks the external proposal as requested.
    ///
    /// At most one proposal can be in flight.
    #[instrument(skip(self))]
    pub fn begin_external_move(&self) -> Result<TurnState, TurnError> {
        self.ensure_in_progress()?;
        if self.to_move != EXTERNAL || self.awaiting_external_move {
            return Err(TurnError::NotYourTurn);
        }
        debug!("External move requested");
        Ok(TurnState {
            awaiting_external_move: true,
            ..self.clone()
        })
    }

    /// Applies the proposer's answer, or the fallback column when the
    /// answer is an error or cannot be played.
    ///
    /// # Panics
    ///
    /// Panics if the game is in progress yet no column is open, which
    /// the rules make impossible.
    #[instrument(skip(self, proposal))]
    pub fn apply_external_proposal(
        &self,
        proposal: Result<usize, ProposerError>,
    ) -> Result<(TurnState, ExternalMove), TurnError> {
        self.ensure_in_progress()?;
        if self.to_move != EXTERNAL || !self.awaiting_external_move {
            return Err(TurnError::NotYourTurn);
        }

        let proposed = match proposal {
            Ok(column) => match self.board.drop_piece(column, EXTERNAL) {
                Ok(board) => Some((column, board)),
                Err(e) => {
                    warn!(column, error = %e, "Proposed column cannot be played, using fallback");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "Proposer failed, using fallback");
                None
            }
        };

        let (column, board, source) = match proposed {
            Some((column, board)) => (column, board, ExternalMoveSource::Proposer),
            None => {
                let Some(column) = self.board.first_open_column() else {
                    panic!("invariant violated: game in progress but every column is full");
                };
                let board = self.board.drop_piece(column, EXTERNAL)?;
                (column, board, ExternalMoveSource::Fallback)
            }
        };

        let next = self.advance(Move::new(EXTERNAL, column), board);
        Ok((next, ExternalMove { column, source }))
    }

    /// Builds the state after `action` produced `board`.
    fn advance(&self, action: Move, board: Board) -> TurnState {
        debug_assert!(
            BoardInvariants::check_all(&board).is_ok(),
            "board invariants violated after {action}:\n{board}"
        );

        let outcome = evaluate(&board);
        let mut history = self.history.clone();
        history.push(action);
        info!(%action, %outcome, "Move applied");

        TurnState {
            board,
            to_move: action.player.opponent(),
            outcome,
            awaiting_external_move: false,
            history,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::standard()
    }
}
