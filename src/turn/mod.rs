//! Turn alternation between the human and the external proposer.

mod controller;
mod state;

pub use controller::{DEFAULT_PROPOSER_TIMEOUT, PendingTurn, TurnController};
pub use state::{
    EXTERNAL, ExternalMove, ExternalMoveSource, HUMAN, TurnError, TurnPhase, TurnState,
};
