//! Presentation collaborators for finished convergence sequences.
//!
//! Solvers never report on their own; callers pass a finished
//! [`Solution`](crate::solution::Solution) (or the history carried by a failure) to a
//! [`ReportSink`].

use std::fmt::Write as _;

use log::info;

/// Borrowed view of everything a sink needs to present one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceReport<'a> {
    /// Method label, e.g. `"Conjugate Gradient"`.
    pub method: &'a str,
    /// Relaxation factor of damped stationary runs.
    pub relaxation: Option<f64>,
    /// Number of executed iterations.
    pub iterations: usize,
    /// Residual norm after each iteration.
    pub residuals: &'a [f64],
    /// Ratio of consecutive residual norms.
    pub ratios: &'a [f64],
}

impl ConvergenceReport<'_> {
    /// Chart-style title, e.g. `"Jacobi with W=0.35"`.
    pub fn title(&self) -> String {
        match self.relaxation {
            Some(w) => format!("{} with W={w}", self.method),
            None => self.method.to_string(),
        }
    }

    pub fn final_residual(&self) -> Option<f64> {
        self.residuals.last().copied()
    }
}

/// Consumer of finished convergence sequences.
pub trait ReportSink {
    fn report(&mut self, report: &ConvergenceReport<'_>);
}

/// Emits a one-line summary per run through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn report(&mut self, report: &ConvergenceReport<'_>) {
        info!(
            "{}: Number of Iterations: {}, final residual {:e}",
            report.title(),
            report.iterations,
            report.final_residual().unwrap_or(f64::NAN)
        );
    }
}

/// Renders each run as a plain-text table of iteration, residual and ratio.
#[derive(Clone, Debug, Default)]
pub struct TableSink {
    buffer: String,
}

impl TableSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text rendered so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl ReportSink for TableSink {
    fn report(&mut self, report: &ConvergenceReport<'_>) {
        // Writing into a `String` cannot fail.
        let _ = writeln!(self.buffer, "# {}", report.title());
        let _ = writeln!(self.buffer, "{:>9}  {:>14}  {:>14}", "iteration", "residual", "ratio");
        for (index, (residual, ratio)) in report.residuals.iter().zip(report.ratios).enumerate() {
            let _ = writeln!(self.buffer, "{index:>9}  {residual:>14.6e}  {ratio:>14.6e}");
        }
        let _ = writeln!(self.buffer, "Number of Iterations: {}", report.iterations);
    }
}
