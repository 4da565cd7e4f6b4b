//! Diagnostic error types for call plans
//!
//! The broadcasting engine itself never fails at run time: a mismatched set of
//! operands is rejected by the type checker. [`Plan`](crate::Plan) and
//! [`resolve_arity`](crate::resolve_arity) mirror that check on plain arity
//! lists, and report what the type checker would have rejected as a
//! [`ShapeError`].

use thiserror::Error;

/// Error produced when a list of operand arities cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The call had no operands at all (not even an operation).
    #[error("ShapeError: a call needs at least one operand")]
    NoOperands,

    /// Two elementwise operands disagree on their element count.
    #[error(
        "ShapeError: operand #{position} has {found} elements, expected {expected} to match earlier operands"
    )]
    ArityMismatch {
        /// Zero-based position of the offending operand (the operation is #0)
        position: usize,
        /// Arity established by the earlier elementwise operands
        expected: usize,
        /// Arity of the offending operand
        found: usize,
    },
}

impl ShapeError {
    /// Create an empty-call error
    pub const fn no_operands() -> Self {
        ShapeError::NoOperands
    }

    /// Create an arity mismatch error
    pub const fn arity_mismatch(position: usize, expected: usize, found: usize) -> Self {
        ShapeError::ArityMismatch {
            position,
            expected,
            found,
        }
    }

    /// Position of the operand that caused the error, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ShapeError::NoOperands => None,
            ShapeError::ArityMismatch { position, .. } => Some(*position),
        }
    }
}

/// Result type for arity resolution
pub type ShapeResult<T> = Result<T, ShapeError>;
