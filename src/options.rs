//! Solver selection and iteration-budget configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// Iterative methods offered by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Stationary iteration with `M = diag(A)`, optionally damped.
    Jacobi,
    /// Stationary iteration with `M = diag(A) + strict-lower(A)`, never damped.
    GaussSeidel,
    /// Descent along the residual with the energy-norm optimal step.
    SteepestDescent,
    /// Three-term recurrence over `A`-conjugate directions.
    ConjugateGradient,
    /// Descent along the residual with the residual-norm optimal step, fixed budget.
    Gmres1,
}

impl Method {
    /// Every method, in the order they are usually compared.
    pub const ALL: [Method; 5] = [
        Method::Jacobi,
        Method::GaussSeidel,
        Method::SteepestDescent,
        Method::ConjugateGradient,
        Method::Gmres1,
    ];

    /// Human-readable name used in reports and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Method::Jacobi => "Jacobi",
            Method::GaussSeidel => "Gauss Seidel",
            Method::SteepestDescent => "Steepest Descent",
            Method::ConjugateGradient => "Conjugate Gradient",
            Method::Gmres1 => "GMRES(1)",
        }
    }

    /// Whether the method is driven by a matrix splitting.
    pub fn is_stationary(self) -> bool {
        matches!(self, Method::Jacobi | Method::GaussSeidel)
    }
}

/// Iteration budget, stopping tolerance and relaxation shared by every solver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Maximum number of iterations; at least one.
    pub max_iterations: usize,
    /// Threshold on the relative residual `‖Ax − b‖ / ‖b‖`.
    pub epsilon: f64,
    /// Relaxation factor `w` blending the new and previous iterate (stationary methods only).
    pub relaxation: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            epsilon: 1e-2,
            relaxation: 1.0,
        }
    }
}

impl SolverOptions {
    /// Defaults tuned per method: Jacobi is under-relaxed and held to a tighter tolerance,
    /// GMRES(1) runs a shorter fixed budget.
    pub fn for_method(method: Method) -> Self {
        match method {
            Method::Jacobi => Self {
                epsilon: 1e-3,
                relaxation: 0.35,
                ..Self::default()
            },
            Method::Gmres1 => Self {
                max_iterations: 50,
                ..Self::default()
            },
            Method::GaussSeidel | Method::SteepestDescent | Method::ConjugateGradient => {
                Self::default()
            }
        }
    }

    /// Override the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Override the relative-residual tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Override the relaxation factor `w`.
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Checks the budget before any iteration runs.
    ///
    /// The relaxation factor is only required to be finite and positive; values outside
    /// `(0, 2)` are accepted even though they usually prevent convergence.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::invalid_option("max_iterations", 0.0));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(SolverError::invalid_option("epsilon", self.epsilon));
        }
        if !(self.relaxation.is_finite() && self.relaxation > 0.0) {
            return Err(SolverError::invalid_option("relaxation", self.relaxation));
        }
        Ok(())
    }
}
