//! Successful solver output and the terminal state that produced it.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::history::ConvergenceHistory;
use crate::report::ReportSink;

/// How a successful solve ended.
///
/// Failure is not a variant: descent methods that exhaust their budget return
/// [`SolverError::DidNotConverge`](crate::error::SolverError::DidNotConverge) instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The relative residual dropped below `epsilon`.
    Converged,
    /// The iteration budget ran out; the last iterate is returned anyway.
    BudgetExhausted,
}

/// Final iterate together with the convergence diagnostics of the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solution {
    /// The last iterate.
    pub x: DVector<f64>,
    /// Residual and ratio sequences, one entry per executed iteration.
    pub history: ConvergenceHistory,
    /// Terminal state.
    pub termination: Termination,
    /// Relative residual `‖Ax − b‖ / ‖b‖` of `x`.
    pub relative_residual: f64,
    /// Label of the method that produced the solution.
    pub method: String,
    /// Relaxation factor, recorded for damped stationary runs.
    pub relaxation: Option<f64>,
}

impl Solution {
    /// Number of iterations actually executed.
    pub fn iterations(&self) -> usize {
        self.history.len()
    }

    /// Whether the tolerance was met, as opposed to the budget running out.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Hands the finished sequences to a presentation sink.
    pub fn report_to<S: ReportSink + ?Sized>(&self, sink: &mut S) {
        sink.report(&self.history.report(&self.method, self.relaxation));
    }
}
