//! Generalized stationary iteration `x ← (1 − w)x + w·M⁻¹(b − Nx)`.

use log::{debug, trace, warn};

use crate::error::{Result, SolverError};
use crate::history::ConvergenceHistory;
use crate::options::{Method, SolverOptions};
use crate::solution::{Solution, Termination};
use crate::splitting::Splitting;
use crate::system::LinearSystem;

/// Damped Jacobi iteration with `M = diag(A)`.
pub fn jacobi(system: &LinearSystem, options: &SolverOptions) -> Result<Solution> {
    let splitting = Splitting::jacobi(system.matrix());
    let mut solution = run(system, &splitting, options, Method::Jacobi.label())?;
    solution.relaxation = Some(options.relaxation);
    Ok(solution)
}

/// Gauss-Seidel iteration with `M = D + L`; the relaxation factor is forced to one.
pub fn gauss_seidel(system: &LinearSystem, options: &SolverOptions) -> Result<Solution> {
    let splitting = Splitting::gauss_seidel(system.matrix());
    let options = options.clone().with_relaxation(1.0);
    run(system, &splitting, &options, Method::GaussSeidel.label())
}

/// Runs the fixed-point iteration defined by `splitting` until the relative residual drops
/// below `options.epsilon` or the budget runs out.
///
/// Running out of budget is not an error here: the last iterate is returned with
/// [`Termination::BudgetExhausted`]. A singular `M` is rejected before the first iteration.
/// The relaxation factor is recorded on the solution only when it actually damps (`w != 1`).
pub fn run(
    system: &LinearSystem,
    splitting: &Splitting,
    options: &SolverOptions,
    label: &'static str,
) -> Result<Solution> {
    options.validate()?;
    let n = system.dimension();
    if splitting.dimension() != n {
        return Err(SolverError::dimension_mismatch(
            "splitting dimension",
            n,
            splitting.dimension(),
        ));
    }

    let m_inverse = splitting
        .m()
        .clone()
        .try_inverse()
        .filter(|inverse| inverse.iter().all(|value| value.is_finite()))
        .ok_or_else(|| SolverError::singular("stationary iteration"))?;

    let w = options.relaxation;
    let a = system.matrix();
    let b = system.rhs();
    let mut x = system.initial_guess().clone();
    let mut history = ConvergenceHistory::new(system.residual_norm(&x));

    debug!(
        "{label}: n = {n}, max_iterations = {}, epsilon = {:e}, w = {w}",
        options.max_iterations, options.epsilon
    );

    let mut iteration = 0usize;
    loop {
        let correction = &m_inverse * (b - splitting.n() * &x);
        let next = &x * (1.0 - w) + correction * w;

        let residual = (a * &next - b).norm();
        let ratio = history.push(residual);
        let relative_residual = system.relative(residual);
        trace!("{label} iteration {iteration}: residual {residual:e}, ratio {ratio:e}");

        if !relative_residual.is_finite() {
            return Err(SolverError::instability(label, iteration, "iterate"));
        }

        let converged = relative_residual < options.epsilon;
        if converged || iteration + 1 == options.max_iterations {
            let termination = if converged {
                debug!("{label}: converged after {} iterations", iteration + 1);
                Termination::Converged
            } else {
                warn!(
                    "{label}: budget of {} iterations exhausted, relative residual {relative_residual:e}",
                    options.max_iterations
                );
                Termination::BudgetExhausted
            };
            return Ok(Solution {
                x: next,
                history,
                termination,
                relative_residual,
                method: label.to_string(),
                relaxation: (w != 1.0).then_some(w),
            });
        }
        x = next;
        iteration += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TableSink;
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    #[test]
    fn diagonal_system_converges_in_one_jacobi_step() {
        let a = DMatrix::from_diagonal(&DVector::from_vec(vec![4.0, 9.0]));
        let b = DVector::from_vec(vec![4.0, 9.0]);
        let system = LinearSystem::new(a, b).unwrap();
        let options = SolverOptions::for_method(Method::Jacobi).with_relaxation(1.0);

        let solution = jacobi(&system, &options).unwrap();
        assert_eq!(solution.iterations(), 1);
        assert!(solution.converged());
        assert_relative_eq!(solution.x, DVector::from_vec(vec![1.0, 1.0]), epsilon = 1e-14);
        assert_relative_eq!(solution.history.residuals()[0], 0.0, epsilon = 1e-14);
    }

    #[test]
    fn exact_initial_guess_is_a_fixed_point_for_any_relaxation() {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 0.0, 1.0, 5.0, 2.0, 0.0, 2.0, 6.0]);
        let x_star = DVector::from_vec(vec![1.0, -2.0, 0.5]);
        let b = &a * &x_star;

        for w in [0.35, 1.0, 1.5] {
            let system = LinearSystem::new(a.clone(), b.clone())
                .unwrap()
                .with_initial_guess(x_star.clone())
                .unwrap();
            let options = SolverOptions::default().with_relaxation(w);
            let solution = jacobi(&system, &options).unwrap();
            assert_eq!(solution.iterations(), 1);
            assert_relative_eq!(solution.x, x_star, epsilon = 1e-12);
            assert!(solution.history.residuals()[0] < 1e-12);
        }
    }

    #[test]
    fn singular_splitting_fails_before_iterating() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let system = LinearSystem::new(a.clone(), DVector::from_element(2, 1.0)).unwrap();
        let splitting = Splitting::from_preconditioner(&a, DMatrix::zeros(2, 2)).unwrap();

        let result = system.solve_with_splitting(&splitting, &SolverOptions::default());
        assert!(matches!(result, Err(SolverError::SingularSplitting { .. })));
    }

    #[test]
    fn exhausted_budget_still_returns_the_iterate() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let system = LinearSystem::new(a, DVector::from_vec(vec![1.0, 2.0])).unwrap();
        let options = SolverOptions::default()
            .with_max_iterations(3)
            .with_epsilon(1e-12);

        let solution = gauss_seidel(&system, &options).unwrap();
        assert_eq!(solution.termination, Termination::BudgetExhausted);
        assert!(!solution.converged());
        assert_eq!(solution.iterations(), 3);
        assert_eq!(solution.relaxation, None);
    }

    #[test]
    fn ratios_compare_consecutive_residuals() {
        let a = DMatrix::from_row_slice(3, 3, &[5.0, 1.0, 1.0, 1.0, 6.0, 2.0, 1.0, 2.0, 7.0]);
        let b = DVector::from_vec(vec![1.0, 0.0, -1.0]);
        let system = LinearSystem::new(a, b).unwrap();
        let options = SolverOptions::default().with_epsilon(1e-10);

        let solution = jacobi(&system, &options).unwrap();
        let history = &solution.history;
        let mut previous = history.initial_residual();
        for (residual, ratio) in history.residuals().iter().zip(history.ratios()) {
            if previous > 0.0 {
                assert_relative_eq!(*ratio, residual / previous, epsilon = 1e-12);
            }
            previous = *residual;
        }
    }

    #[test]
    fn non_finite_inverse_counts_as_singular() {
        let a = DMatrix::from_diagonal(&DVector::from_vec(vec![1e-310, 1.0]));
        let system = LinearSystem::new(a, DVector::from_element(2, 1.0)).unwrap();

        let result = jacobi(&system, &SolverOptions::for_method(Method::Jacobi));
        assert!(matches!(result, Err(SolverError::SingularSplitting { .. })));
    }

    #[test]
    fn overflowing_iterate_is_reported() {
        let a = DMatrix::from_diagonal(&DVector::from_vec(vec![4.0, 9.0]));
        let system = LinearSystem::new(a, DVector::from_vec(vec![4.0, 9.0])).unwrap();
        let options = SolverOptions::default().with_relaxation(1e308);

        let result = jacobi(&system, &options);
        assert!(matches!(
            result,
            Err(SolverError::NumericalInstability {
                method: "Jacobi",
                iteration: 0,
                quantity: "iterate",
            })
        ));
    }

    #[test]
    fn relaxation_recorded_only_when_damping() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let system = LinearSystem::new(a, DVector::from_vec(vec![1.0, 2.0])).unwrap();

        let undamped = jacobi(&system, &SolverOptions::default()).unwrap();
        assert_eq!(undamped.relaxation, Some(1.0));

        let splitting = Splitting::jacobi(system.matrix());
        let general = system
            .solve_with_splitting(&splitting, &SolverOptions::default())
            .unwrap();
        assert_eq!(general.method, "General Iterative");
        assert_eq!(general.relaxation, None);

        let damped = system
            .solve_with_splitting_labelled(
                &splitting,
                &SolverOptions::default().with_relaxation(0.7),
                "Jacobi",
            )
            .unwrap();
        let mut sink = TableSink::new();
        damped.report_to(&mut sink);
        assert!(sink.as_str().starts_with("# Jacobi with W=0.7\n"));
    }

    #[test]
    fn mismatched_splitting_is_rejected() {
        let system =
            LinearSystem::new(DMatrix::identity(3, 3), DVector::from_element(3, 1.0)).unwrap();
        let splitting = Splitting::jacobi(&DMatrix::identity(2, 2));
        let result = run(&system, &splitting, &SolverOptions::default(), "custom");
        assert!(matches!(result, Err(SolverError::DimensionMismatch { .. })));
    }
}
