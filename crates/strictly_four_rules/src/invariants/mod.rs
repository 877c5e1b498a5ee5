//! First-class invariants for Connect Four boards.
//!
//! Invariants are logical properties every board reached through legal
//! play satisfies. They are testable on their own and are asserted in
//! debug builds after each applied move.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violated: {}", self.description)
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples so sets compose without boxing.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check_one<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn into_result(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1> InvariantSet<S> for (I1,)
where
    I1: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        into_result(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        check_one::<S, I2>(state, &mut violations);
        into_result(violations)
    }
}

pub mod gravity;
pub mod piece_balance;

pub use gravity::GravityInvariant;
pub use piece_balance::PieceBalanceInvariant;

/// Every invariant of a board reached by legal alternating play.
pub type BoardInvariants = (GravityInvariant, PieceBalanceInvariant);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Player};

    #[test]
    fn test_invariant_set_holds_for_empty_board() {
        assert!(BoardInvariants::check_all(&Board::standard()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let board = Board::standard()
            .drop_piece(3, Player::Human)
            .and_then(|b| b.drop_piece(3, Player::Ai))
            .and_then(|b| b.drop_piece(4, Player::Human))
            .unwrap();
        assert!(BoardInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        // Floating pieces, and Ai has two more than Human.
        let board: Board = "\
O...
O...
....
...."
            .parse()
            .unwrap();
        let violations = BoardInvariants::check_all(&board).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].description,
            GravityInvariant::description()
        );
    }

    #[test]
    fn test_single_invariant_as_set() {
        let board: Board = "OO\nXX".parse().unwrap();
        assert!(<(GravityInvariant,)>::check_all(&board).is_ok());
    }
}
