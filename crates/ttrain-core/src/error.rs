//! Error types for tensor-train operations
//!
//! A single error enum is shared by every crate in the stack so that callers
//! can match on the failure kind regardless of which layer detected it.
//! Shape and rank-spec problems are detected eagerly at call boundaries;
//! numerical problems abort the running sweep and never leak a partially
//! built train.

use thiserror::Error;

/// Result type for tensor-train operations
pub type TtResult<T> = Result<T, TtError>;

/// Errors raised by tensor-train construction, decomposition and algebra
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TtError {
    /// Operands have incompatible mode sizes, ranks or lengths
    #[error("{operation}: shape mismatch - {detail}")]
    ShapeMismatch {
        /// Operation that detected the mismatch
        operation: String,
        /// What did not line up
        detail: String,
    },

    /// A requested rank is zero, or the rank list has the wrong length
    #[error("Invalid rank specification: {0}")]
    InvalidRankSpec(String),

    /// Non-finite values reached a factorization, or the factorization failed
    #[error("{operation}: ill-conditioned input - {detail}")]
    IllConditionedInput {
        /// Operation that hit the numerical failure
        operation: String,
        /// Description of the failure
        detail: String,
    },

    /// A rank cap prevents the requested tolerance from being reached
    #[error(
        "Tolerance {requested:e} cannot be met under the rank cap (achieved relative error {achieved:e})"
    )]
    ToleranceUnsatisfiable {
        /// Requested relative Frobenius tolerance
        requested: f64,
        /// Relative error bound actually achieved with the capped ranks
        achieved: f64,
    },

    /// The cores do not form a valid train (empty, boundary ranks, rank chain)
    /// or a parameter is outside its domain
    #[error("Invalid tensor train: {0}")]
    InvalidStructure(String),

    /// A Kronecker-only operation was applied to a general TT-matrix
    #[error("Not a Kronecker product: {0}")]
    NotKronecker(String),

    /// A batch was cancelled between two independent items
    #[error("Batch cancelled after {completed} completed item(s)")]
    Cancelled {
        /// Number of items finished before cancellation was observed
        completed: usize,
    },
}

impl TtError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        TtError::ShapeMismatch {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Create an ill-conditioned input error
    pub fn ill_conditioned(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        TtError::IllConditionedInput {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// Create an invalid rank specification error
    pub fn invalid_rank(detail: impl Into<String>) -> Self {
        TtError::InvalidRankSpec(detail.into())
    }

    /// Create an invalid structure error
    pub fn invalid_structure(detail: impl Into<String>) -> Self {
        TtError::InvalidStructure(detail.into())
    }
}
