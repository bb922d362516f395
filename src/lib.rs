//! Iterative solvers for dense square linear systems `Ax = b`.
//!
//! The crate compares classical iterative methods on a given matrix without ever
//! factorizing it. It offers
//!
//! - stationary splitting methods driven by one generalized engine (`stationary` module):
//!   Jacobi, Gauss-Seidel and arbitrary block splittings built in the `splitting` module,
//! - Krylov-type descent methods (`descent` module): Steepest Descent, Conjugate Gradient
//!   and the single-direction GMRES(1) variant,
//! - per-iteration residual and convergence-ratio tracking (`history` module), and
//! - presentation sinks that consume finished runs (`report` module).
//!
//! Each method keeps its own terminal policy. Stationary runs always hand back an iterate
//! and say whether they converged or ran out of budget; Steepest Descent and Conjugate
//! Gradient treat an exhausted budget as an error; GMRES(1) always runs its full budget.
//!
//! # Quick start
//!
//! ```no_run
//! use itersolve::{LinearSystem, Method, SolverOptions};
//! use itersolve::report::LogSink;
//! use nalgebra::{DMatrix, DVector};
//!
//! let a = DMatrix::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 2.0]);
//! let b = DVector::from_vec(vec![1.0, 1.0]);
//! let system = LinearSystem::new(a, b).expect("square system");
//!
//! let options = SolverOptions::for_method(Method::ConjugateGradient).with_epsilon(1e-6);
//! let solution = system
//!     .solve(Method::ConjugateGradient, &options)
//!     .expect("converged");
//! println!("x = {:?} after {} iterations", solution.x, solution.iterations());
//! solution.report_to(&mut LogSink);
//! ```

pub mod compare;
pub mod descent;
pub mod error;
pub mod generate;
pub mod history;
pub mod options;
pub mod report;
pub mod solution;
pub mod splitting;
pub mod stationary;
pub mod system;

pub use error::SolverError;
pub use history::ConvergenceHistory;
pub use options::{Method, SolverOptions};
pub use solution::{Solution, Termination};
pub use splitting::{BlockPartition, Splitting};
pub use system::LinearSystem;
