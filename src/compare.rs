//! Side-by-side runs of several methods on one system.

use rayon::prelude::*;

use crate::error::Result;
use crate::options::{Method, SolverOptions};
use crate::solution::Solution;
use crate::system::LinearSystem;

/// Outcome of one method in a comparison.
#[derive(Debug)]
pub struct MethodRun {
    pub method: Method,
    pub options: SolverOptions,
    pub outcome: Result<Solution>,
}

/// Solves `system` once per `(method, options)` pair.
///
/// The solves share nothing but the read-only system, so they run on the rayon pool; each
/// individual solve stays sequential. Results come back in input order.
pub fn compare_methods(system: &LinearSystem, runs: &[(Method, SolverOptions)]) -> Vec<MethodRun> {
    runs.par_iter()
        .map(|(method, options)| MethodRun {
            method: *method,
            options: options.clone(),
            outcome: system.solve(*method, options),
        })
        .collect()
}

/// Runs every [`Method`] with its default options.
pub fn compare_all(system: &LinearSystem) -> Vec<MethodRun> {
    let runs: Vec<_> = Method::ALL
        .iter()
        .map(|method| (*method, SolverOptions::for_method(*method)))
        .collect();
    compare_methods(system, &runs)
}
