//! Errors used throughout the rules engine.
//!
//! `RulesError` is the single error type of the crate. Its variants split
//! into three families with different recovery contracts:
//! - `MalformedInput`: the caller handed over bad text or coordinates. Reject
//!   the input and ask again.
//! - `IllegalMove`: the requested move is not currently legal. The strict
//!   engine API returns it, the permissive API turns it into `false`.
//! - `InvariantViolation`: internal bookkeeping went wrong (missing hash,
//!   missing figure during apply/undo). This is a bug, not bad input.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// A text field or coordinate could not be interpreted.
    ///
    /// `field` names the offending field (for example `"castling rights"` or
    /// `"algebraic square"`) so messages stay localized.
    #[error("malformed {field}: {message}")]
    MalformedInput { field: &'static str, message: String },

    /// The move is not among the legal moves of its origin square.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// Internal state is inconsistent.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl RulesError {
    pub fn malformed(field: &'static str, message: impl Into<String>) -> Self {
        RulesError::MalformedInput {
            field,
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        RulesError::InvariantViolation(message.into())
    }
}

pub type RulesResult<T> = Result<T, RulesError>;

#[cfg(test)]
mod tests {
    use super::RulesError;

    #[test]
    fn malformed_message_names_the_field() {
        let err = RulesError::malformed("side to move", "expected 'w' or 'b', got 'x'");
        assert_eq!(
            err.to_string(),
            "malformed side to move: expected 'w' or 'b', got 'x'"
        );
    }
}
