//! Per-iteration bookkeeping of residual norms and convergence ratios.

use serde::{Deserialize, Serialize};

use crate::report::ConvergenceReport;

/// Residual norms `‖Ax_k − b‖₂` and consecutive ratios recorded during a solve.
///
/// Entry `k` of [`residuals`](Self::residuals) belongs to the iterate produced by
/// iteration `k`; entry `k` of [`ratios`](Self::ratios) compares it with the residual of the
/// iterate that went into that iteration, so the first ratio is measured against the
/// initial guess.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceHistory {
    initial_residual: f64,
    residuals: Vec<f64>,
    ratios: Vec<f64>,
}

impl ConvergenceHistory {
    /// Starts an empty history anchored at the residual norm of the initial guess.
    pub fn new(initial_residual: f64) -> Self {
        Self {
            initial_residual,
            residuals: Vec::new(),
            ratios: Vec::new(),
        }
    }

    /// Appends the residual norm of a freshly computed iterate and returns its ratio.
    ///
    /// When the previous residual is exactly zero the ratio is reported as zero: there is
    /// nothing left to contract.
    pub fn push(&mut self, residual: f64) -> f64 {
        let previous = self.last_residual();
        let ratio = if previous == 0.0 {
            0.0
        } else {
            residual / previous
        };
        self.residuals.push(residual);
        self.ratios.push(ratio);
        ratio
    }

    /// Residual norm of the initial guess.
    pub fn initial_residual(&self) -> f64 {
        self.initial_residual
    }

    /// Most recent residual norm, falling back to the initial one before any iteration.
    pub fn last_residual(&self) -> f64 {
        self.residuals
            .last()
            .copied()
            .unwrap_or(self.initial_residual)
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Number of completed iterations.
    pub fn len(&self) -> usize {
        self.residuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residuals.is_empty()
    }

    /// Packages the sequences for a [`ReportSink`](crate::report::ReportSink).
    pub fn report<'a>(
        &'a self,
        method: &'a str,
        relaxation: Option<f64>,
    ) -> ConvergenceReport<'a> {
        ConvergenceReport {
            method,
            relaxation,
            iterations: self.len(),
            residuals: &self.residuals,
            ratios: &self.ratios,
        }
    }
}
