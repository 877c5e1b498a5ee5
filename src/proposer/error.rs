//! Move proposer error types.

use derive_more::{Display, Error};
use std::time::Duration;
use tracing::{instrument, warn};

/// What went wrong while asking for a move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ProposerErrorKind {
    /// The request never produced an answer (network, auth, API error).
    #[display("transport failure: {_0}")]
    Transport(String),
    /// No answer arrived within the allowed time.
    #[display("timed out after {}ms", _0.as_millis())]
    Timeout(Duration),
    /// An answer arrived but did not contain a readable column.
    #[display("malformed response: {_0}")]
    MalformedResponse(String),
    /// The answer named a column that cannot be played.
    #[display("invalid column {column}: {reason}")]
    InvalidColumn {
        /// Column as proposed, before any validation.
        column: i64,
        /// Why it was refused.
        reason: String,
    },
    /// Every column is full.
    #[display("no open column")]
    NoOpenColumn,
}

/// Move proposer error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Proposer error: {} at {}:{}", kind, file, line)]
pub struct ProposerError {
    /// What went wrong.
    pub kind: ProposerErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProposerError {
    /// Creates a new proposer error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ProposerErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        warn!(error_kind = %kind, "Proposer error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns what went wrong.
    pub fn kind(&self) -> &ProposerErrorKind {
        &self.kind
    }
}

impl From<crate::LlmError> for ProposerError {
    #[track_caller]
    fn from(err: crate::LlmError) -> Self {
        Self::new(ProposerErrorKind::Transport(err.message))
    }
}
