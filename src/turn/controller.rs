//! Turn controller: owns the game and drives the external side.

use super::state::{EXTERNAL, ExternalMove, TurnError, TurnPhase, TurnState};
use crate::proposer::{MoveProposer, ProposerError, ProposerErrorKind};
use std::time::Duration;
use strictly_four_rules::{Board, Player};
use tracing::{debug, info, instrument, warn};

/// How long the proposer may take before the fallback column is played.
pub const DEFAULT_PROPOSER_TIMEOUT: Duration = Duration::from_secs(30);

/// Ticket for an external move that has been requested but not applied.
///
/// Carries the board snapshot the proposer should look at. Tickets
/// outlive neither a reset nor the move they were issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    game: u64,
    ply: usize,
    board: Board,
    player: Player,
}

impl PendingTurn {
    /// Board the proposal is for.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side the proposal is for.
    pub fn player(&self) -> Player {
        self.player
    }
}

/// Owns the current [`TurnState`] and the proposer for the external side.
///
/// The state is replaced wholesale on every transition and never
/// patched in place. While a proposal is in flight human moves are
/// rejected, not queued.
pub struct TurnController<P> {
    state: TurnState,
    empty_board: Board,
    proposer: P,
    think_delay: Duration,
    proposer_timeout: Duration,
    game: u64,
}

impl<P: MoveProposer> TurnController<P> {
    /// Creates a controller for a fresh `rows` x `cols` game.
    #[instrument(skip(proposer), fields(proposer = %proposer.name()))]
    pub fn new(rows: usize, cols: usize, proposer: P) -> Result<Self, TurnError> {
        let empty_board = Board::new(rows, cols)?;
        info!("Creating turn controller");
        Ok(Self {
            state: TurnState::from_empty(empty_board.clone()),
            empty_board,
            proposer,
            think_delay: Duration::ZERO,
            proposer_timeout: DEFAULT_PROPOSER_TIMEOUT,
            game: 0,
        })
    }

    /// Creates a controller for a fresh 6x7 game.
    pub fn standard(proposer: P) -> Self {
        let empty_board = Board::standard();
        Self {
            state: TurnState::from_empty(empty_board.clone()),
            empty_board,
            proposer,
            think_delay: Duration::ZERO,
            proposer_timeout: DEFAULT_PROPOSER_TIMEOUT,
            game: 0,
        }
    }

    /// Sets the pause taken before asking the proposer.
    pub fn with_think_delay(mut self, think_delay: Duration) -> Self {
        self.think_delay = think_delay;
        self
    }

    /// Sets how long a single proposer call may run.
    pub fn with_proposer_timeout(mut self, proposer_timeout: Duration) -> Self {
        self.proposer_timeout = proposer_timeout;
        self
    }

    /// Returns the current state.
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TurnPhase {
        self.state.phase()
    }

    /// Returns the proposer.
    pub fn proposer(&self) -> &P {
        &self.proposer
    }

    /// Drops the human's piece into `column`.
    ///
    /// On rejection the state is unchanged and the reason is returned.
    #[instrument(skip(self))]
    pub fn submit_move(&mut self, column: usize) -> Result<&TurnState, TurnError> {
        let next = self.state.submit_move(column)?;
        self.state = next;
        Ok(&self.state)
    }

    /// Handles a click on a column, ignoring it unless the human may move there.
    ///
    /// Returns whether a move was applied.
    #[instrument(skip(self))]
    pub fn column_clicked(&mut self, column: usize) -> bool {
        match self.submit_move(column) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Ignoring column click");
                false
            }
        }
    }

    /// Marks the external move as in flight and returns its ticket.
    #[instrument(skip(self))]
    pub fn request_external_move(&mut self) -> Result<PendingTurn, TurnError> {
        self.state = self.state.begin_external_move()?;
        Ok(self.ticket())
    }

    fn ticket(&self) -> PendingTurn {
        PendingTurn {
            game: self.game,
            ply: self.state.history().len(),
            board: self.state.board().clone(),
            player: EXTERNAL,
        }
    }

    /// Applies the proposer's result for `pending`, falling back to the
    /// first open column on any failure.
    #[instrument(skip(self, pending, result))]
    pub fn complete_external_move(
        &mut self,
        pending: PendingTurn,
        result: Result<usize, ProposerError>,
    ) -> Result<ExternalMove, TurnError> {
        if pending.game != self.game || pending.ply != self.state.history().len() {
            return Err(TurnError::StaleTurn);
        }
        let (next, applied) = self.state.apply_external_proposal(result)?;
        info!(
            column = applied.column,
            source = %applied.source,
            outcome = %next.outcome(),
            "External move applied"
        );
        self.state = next;
        Ok(applied)
    }

    /// Plays the external side's turn: request, think, ask the proposer
    /// once, apply the answer or the fallback.
    ///
    /// A proposer that does not answer within the proposer timeout counts
    /// as failed. If an earlier call was abandoned while in flight, its
    /// request is picked up again here.
    #[instrument(skip(self), fields(proposer = %self.proposer.name()))]
    pub async fn play_external_turn(&mut self) -> Result<ExternalMove, TurnError> {
        let pending = match self.phase() {
            TurnPhase::ExternalToMove { pending: true } => {
                debug!("Resuming abandoned external move");
                self.ticket()
            }
            _ => self.request_external_move()?,
        };

        if !self.think_delay.is_zero() {
            tokio::time::sleep(self.think_delay).await;
        }

        debug!("Waiting for proposer");
        let answer = tokio::time::timeout(
            self.proposer_timeout,
            self.proposer.propose(pending.board(), pending.player()),
        )
        .await;
        let result = match answer {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.proposer_timeout.as_millis() as u64, "Proposer timed out");
                Err(ProposerError::new(ProposerErrorKind::Timeout(
                    self.proposer_timeout,
                )))
            }
        };
        self.complete_external_move(pending, result)
    }

    /// Human move followed, if the game goes on, by the external reply.
    #[instrument(skip(self))]
    pub async fn play_round(&mut self, column: usize) -> Result<Option<ExternalMove>, TurnError> {
        self.submit_move(column)?;
        match self.phase() {
            TurnPhase::ExternalToMove { .. } => self.play_external_turn().await.map(Some),
            TurnPhase::HumanToMove | TurnPhase::Finished(_) => Ok(None),
        }
    }

    /// Discards the current game and starts a fresh one.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(game = self.game, "Resetting game");
        self.state = TurnState::from_empty(self.empty_board.clone());
        self.game += 1;
    }
}
