//! Error taxonomy for the operation engine
//!
//! Every variant is an expected, recoverable outcome. The engine guarantees
//! that the stack and ledgers are untouched whenever one of these is
//! returned; callers turn them into user-facing text.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Not enough operands on the stack for the requested operation.
    #[error("Stack too small")]
    StackTooSmall,

    /// An operand or computed result falls outside its required domain.
    #[error("{0}")]
    DomainViolation(String),

    /// A computed value's magnitude exceeds what an f64 can represent.
    #[error("Value too large")]
    NumericOverflow,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// Textual entry (typed or pasted) does not parse to a finite value.
    #[error("Could not decode value: {0}")]
    MalformedEntry(String),
}

impl EngineError {
    /// The standard message for an operand rejected by its domain.
    pub fn not_defined(description: &str, value: f64) -> Self {
        EngineError::DomainViolation(format!("'{description}' is not defined at {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_violation_message_names_the_operation() {
        let err = EngineError::not_defined("y/x", 0.0);
        assert_eq!(err.to_string(), "'y/x' is not defined at 0");
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(EngineError::StackTooSmall.to_string(), "Stack too small");
        assert_eq!(EngineError::NumericOverflow.to_string(), "Value too large");
        assert_eq!(EngineError::NothingToUndo.to_string(), "Nothing to undo");
    }
}
