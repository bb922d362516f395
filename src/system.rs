//! The linear system `Ax = b` handed to every solver.

use nalgebra::{DMatrix, DVector};

use crate::descent;
use crate::error::{Result, SolverError};
use crate::options::{Method, SolverOptions};
use crate::solution::Solution;
use crate::splitting::Splitting;
use crate::stationary;

/// A validated square system together with the initial guess `x0`.
#[derive(Clone, Debug)]
pub struct LinearSystem {
    a: DMatrix<f64>,
    b: DVector<f64>,
    x0: DVector<f64>,
    b_norm: f64,
}

impl LinearSystem {
    /// Builds a system with a zero initial guess.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Result<Self> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(SolverError::dimension_mismatch("matrix columns", n, a.ncols()));
        }
        if b.len() != n {
            return Err(SolverError::dimension_mismatch(
                "right-hand side length",
                n,
                b.len(),
            ));
        }
        let b_norm = b.norm();
        Ok(Self {
            a,
            b,
            x0: DVector::zeros(n),
            b_norm,
        })
    }

    /// Replaces the initial guess.
    pub fn with_initial_guess(mut self, x0: DVector<f64>) -> Result<Self> {
        if x0.len() != self.dimension() {
            return Err(SolverError::dimension_mismatch(
                "initial guess length",
                self.dimension(),
                x0.len(),
            ));
        }
        self.x0 = x0;
        Ok(self)
    }

    /// Order `n` of the system.
    pub fn dimension(&self) -> usize {
        self.a.nrows()
    }

    /// The system matrix `A`.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// The right-hand side `b`.
    pub fn rhs(&self) -> &DVector<f64> {
        &self.b
    }

    /// The initial guess `x0`, zeros unless replaced.
    pub fn initial_guess(&self) -> &DVector<f64> {
        &self.x0
    }

    /// `‖Ax − b‖₂` for an arbitrary candidate `x`.
    pub fn residual_norm(&self, x: &DVector<f64>) -> f64 {
        (&self.a * x - &self.b).norm()
    }

    /// Scales an absolute residual norm by `‖b‖₂`.
    ///
    /// A homogeneous system (`b = 0`) has no natural scale, so the absolute norm is used.
    pub fn relative(&self, residual: f64) -> f64 {
        if self.b_norm > 0.0 {
            residual / self.b_norm
        } else {
            residual
        }
    }

    /// Runs `method` with the given options.
    pub fn solve(&self, method: Method, options: &SolverOptions) -> Result<Solution> {
        match method {
            Method::Jacobi => stationary::jacobi(self, options),
            Method::GaussSeidel => stationary::gauss_seidel(self, options),
            Method::SteepestDescent => descent::steepest_descent(self, options),
            Method::ConjugateGradient => descent::conjugate_gradient(self, options),
            Method::Gmres1 => descent::gmres1(self, options),
        }
    }

    /// Runs the generalized stationary iteration with a caller-supplied splitting.
    pub fn solve_with_splitting(
        &self,
        splitting: &Splitting,
        options: &SolverOptions,
    ) -> Result<Solution> {
        self.solve_with_splitting_labelled(splitting, options, "General Iterative")
    }

    /// Like [`solve_with_splitting`](Self::solve_with_splitting), reporting the run under
    /// `label`, e.g. `"Jacobi"` for a block-Jacobi splitting.
    pub fn solve_with_splitting_labelled(
        &self,
        splitting: &Splitting,
        options: &SolverOptions,
        label: &'static str,
    ) -> Result<Solution> {
        stationary::run(self, splitting, options, label)
    }
}
