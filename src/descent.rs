//! Krylov-type descent methods: Steepest Descent, Conjugate Gradient and GMRES(1).
//!
//! All three keep the residual `r = b − Ax` up to date through the recurrence
//! `r ← r − α·(A d)` instead of recomputing it from scratch, and track the true residual
//! norm `‖Ax − b‖₂` of every iterate in a [`ConvergenceHistory`].
//!
//! They differ in how a run ends:
//!
//! * Steepest Descent and Conjugate Gradient stop as soon as the relative residual drops
//!   below `epsilon`; exhausting the budget is a [`SolverError::DidNotConverge`] error.
//! * GMRES(1) has no tolerance exit. It always performs `max_iterations` steps and returns
//!   the last iterate with [`Termination::BudgetExhausted`].

use log::{debug, trace, warn};
use nalgebra::DVector;

use crate::error::{Result, SolverError};
use crate::history::ConvergenceHistory;
use crate::options::{Method, SolverOptions};
use crate::solution::{Solution, Termination};
use crate::system::LinearSystem;

/// Steepest Descent: step along the residual with `α = rᵗr / rᵗAr`.
///
/// Guaranteed to converge only for symmetric positive-definite `A`, which is not checked.
pub fn steepest_descent(system: &LinearSystem, options: &SolverOptions) -> Result<Solution> {
    options.validate()?;
    let method = Method::SteepestDescent.label();
    let a = system.matrix();
    let mut x = system.initial_guess().clone();
    let mut r = system.rhs() - a * &x;
    let mut history = ConvergenceHistory::new(r.norm());
    log_start(method, system, options);

    for iteration in 0..options.max_iterations {
        let ar = a * &r;
        let alpha = step_length(
            r.dot(&r),
            r.dot(&ar),
            r.norm() * ar.norm(),
            method,
            iteration,
            "r'Ar",
        )?;
        let next_x = &x + &r * alpha;
        let next_r = &r - &ar * alpha;

        let relative_residual = track(system, &mut history, &next_x, method, iteration)?;
        if relative_residual < options.epsilon {
            return Ok(converged(method, next_x, history, relative_residual));
        }
        x = next_x;
        r = next_r;
    }

    Err(did_not_converge(method, system, history))
}

/// Conjugate Gradient: three-term recurrence over `A`-conjugate search directions.
///
/// For symmetric positive-definite `A` of order `n` the exact solution is reached in at
/// most `n` iterations, up to rounding. SPD-ness is not checked.
pub fn conjugate_gradient(system: &LinearSystem, options: &SolverOptions) -> Result<Solution> {
    options.validate()?;
    let method = Method::ConjugateGradient.label();
    let a = system.matrix();
    let mut x = system.initial_guess().clone();
    let mut r = system.rhs() - a * &x;
    let mut p = r.clone();
    let mut rr = r.dot(&r);
    let mut history = ConvergenceHistory::new(r.norm());
    log_start(method, system, options);

    for iteration in 0..options.max_iterations {
        let ap = a * &p;
        let alpha = step_length(
            rr,
            p.dot(&ap),
            p.norm() * ap.norm(),
            method,
            iteration,
            "p'Ap",
        )?;
        let next_x = &x + &p * alpha;
        let next_r = &r - &ap * alpha;

        let relative_residual = track(system, &mut history, &next_x, method, iteration)?;
        if relative_residual < options.epsilon {
            return Ok(converged(method, next_x, history, relative_residual));
        }

        let next_rr = next_r.dot(&next_r);
        let beta = step_length(next_rr, rr, 0.0, method, iteration, "r'r")?;
        p = &next_r + &p * beta;
        x = next_x;
        r = next_r;
        rr = next_rr;
    }

    Err(did_not_converge(method, system, history))
}

/// GMRES(1): step along the residual with `α = rᵗAr / (Ar)ᵗ(Ar)`, which minimizes
/// `‖r − αAr‖₂`, for exactly `max_iterations` iterations.
///
/// `epsilon` is ignored; the returned [`Solution::relative_residual`] tells how close the
/// final iterate is.
pub fn gmres1(system: &LinearSystem, options: &SolverOptions) -> Result<Solution> {
    options.validate()?;
    let method = Method::Gmres1.label();
    let a = system.matrix();
    let mut x = system.initial_guess().clone();
    let mut r = system.rhs() - a * &x;
    let mut history = ConvergenceHistory::new(r.norm());
    let mut relative_residual = system.relative(history.initial_residual());
    log_start(method, system, options);

    for iteration in 0..options.max_iterations {
        let ar = a * &r;
        let alpha = step_length(r.dot(&ar), ar.dot(&ar), 0.0, method, iteration, "(Ar)'(Ar)")?;
        x += &r * alpha;
        r -= &ar * alpha;
        relative_residual = track(system, &mut history, &x, method, iteration)?;
    }

    debug!(
        "{method}: finished fixed budget of {} iterations, relative residual {relative_residual:e}",
        options.max_iterations
    );
    Ok(Solution {
        x,
        history,
        termination: Termination::BudgetExhausted,
        relative_residual,
        method: method.to_string(),
        relaxation: None,
    })
}

/// Divides two inner products, refusing denominators that vanish relative to `scale`.
///
/// A zero numerator yields a zero step: the residual driving the step is already zero
/// (or orthogonal to the search direction) and the iterate must not move.
fn step_length(
    numerator: f64,
    denominator: f64,
    scale: f64,
    method: &'static str,
    iteration: usize,
    quantity: &'static str,
) -> Result<f64> {
    if !numerator.is_finite() {
        return Err(SolverError::instability(method, iteration, quantity));
    }
    if numerator == 0.0 {
        return Ok(0.0);
    }
    if !denominator.is_finite() || denominator.abs() <= f64::EPSILON * scale {
        return Err(SolverError::instability(method, iteration, quantity));
    }
    let step = numerator / denominator;
    if !step.is_finite() {
        return Err(SolverError::instability(method, iteration, quantity));
    }
    Ok(step)
}

/// Records the true residual of `x` and returns its relative value.
fn track(
    system: &LinearSystem,
    history: &mut ConvergenceHistory,
    x: &DVector<f64>,
    method: &'static str,
    iteration: usize,
) -> Result<f64> {
    let residual = system.residual_norm(x);
    let ratio = history.push(residual);
    trace!("{method} iteration {iteration}: residual {residual:e}, ratio {ratio:e}");
    let relative_residual = system.relative(residual);
    if !relative_residual.is_finite() {
        return Err(SolverError::instability(method, iteration, "iterate"));
    }
    Ok(relative_residual)
}

fn log_start(method: &str, system: &LinearSystem, options: &SolverOptions) {
    debug!(
        "{method}: n = {}, max_iterations = {}, epsilon = {:e}",
        system.dimension(),
        options.max_iterations,
        options.epsilon
    );
}

fn converged(
    method: &'static str,
    x: DVector<f64>,
    history: ConvergenceHistory,
    relative_residual: f64,
) -> Solution {
    debug!("{method}: converged after {} iterations", history.len());
    Solution {
        x,
        history,
        termination: Termination::Converged,
        relative_residual,
        method: method.to_string(),
        relaxation: None,
    }
}

fn did_not_converge(
    method: &'static str,
    system: &LinearSystem,
    history: ConvergenceHistory,
) -> SolverError {
    let relative_residual = system.relative(history.last_residual());
    warn!(
        "{method}: no convergence after {} iterations, relative residual {relative_residual:e}",
        history.len()
    );
    SolverError::DidNotConverge {
        method,
        iterations: history.len(),
        relative_residual,
        history,
    }
}
