use thiserror::Error;

use crate::history::ConvergenceHistory;

/// Unified error type for `itersolve` operations.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Raised when the system, initial guess or splitting have incompatible dimensions.
    #[error("dimension mismatch in {context}: expected {expected} but found {found}")]
    DimensionMismatch {
        /// Human-readable context describing the operation.
        context: &'static str,
        /// The required dimension, usually the order of `A`.
        expected: usize,
        /// The dimension that was actually supplied.
        found: usize,
    },

    /// Raised when the `M` part of a splitting (or one of its blocks) cannot be inverted.
    #[error("splitting matrix in {context} is singular")]
    SingularSplitting { context: &'static str },

    /// Raised when a descent method exhausts its budget without meeting the tolerance.
    #[error(
        "{method} did not converge after {iterations} iterations; relative residual {relative_residual}"
    )]
    DidNotConverge {
        /// Label of the method that gave up.
        method: &'static str,
        /// Number of iterations performed before termination.
        iterations: usize,
        /// Relative residual `‖Ax − b‖ / ‖b‖` of the last iterate.
        relative_residual: f64,
        /// Residual and ratio sequences accumulated up to the failure.
        history: ConvergenceHistory,
    },

    /// Raised when a step length would divide by a vanishing or non-finite quantity.
    #[error("{method} broke down at iteration {iteration}: {quantity} is zero or not finite")]
    NumericalInstability {
        method: &'static str,
        iteration: usize,
        /// Name of the offending inner product.
        quantity: &'static str,
    },

    /// Raised when a configuration value is outside its admissible range.
    #[error("invalid value {value} for option `{name}`")]
    InvalidOption { name: &'static str, value: f64 },

    /// Raised when a block partition or its permutation is malformed.
    #[error("invalid block partition: {reason}")]
    InvalidPartition { reason: String },
}

impl SolverError {
    /// Helper to format a [`DimensionMismatch`](SolverError::DimensionMismatch) error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Helper to raise when inverting a splitting matrix fails.
    pub fn singular(context: &'static str) -> Self {
        Self::SingularSplitting { context }
    }

    /// Helper to reject an out-of-range configuration value.
    pub fn invalid_option(name: &'static str, value: f64) -> Self {
        Self::InvalidOption { name, value }
    }

    /// Helper to reject a malformed block partition.
    pub fn invalid_partition<S: Into<String>>(reason: S) -> Self {
        Self::InvalidPartition {
            reason: reason.into(),
        }
    }

    pub(crate) fn instability(
        method: &'static str,
        iteration: usize,
        quantity: &'static str,
    ) -> Self {
        Self::NumericalInstability {
            method,
            iteration,
            quantity,
        }
    }

    /// Returns the partial history carried by a non-convergence failure, if any.
    pub fn history(&self) -> Option<&ConvergenceHistory> {
        match self {
            Self::DidNotConverge { history, .. } => Some(history),
            _ => None,
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, SolverError>;
