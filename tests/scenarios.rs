use approx::assert_relative_eq;
use itersolve::compare::compare_all;
use itersolve::generate::{random_spd, random_vector, ten_node_laplacian};
use itersolve::report::TableSink;
use itersolve::{
    BlockPartition, LinearSystem, Method, SolverError, SolverOptions, Splitting, Termination,
};
use nalgebra::{DMatrix, DVector};

/// Ten-node graph Laplacian shifted by the identity, with alternating unit charges.
fn shifted_laplacian_system() -> LinearSystem {
    let a = ten_node_laplacian() + DMatrix::identity(10, 10);
    let b = DVector::from_fn(10, |i, _| if i % 2 == 0 { 1.0 } else { -1.0 });
    LinearSystem::new(a, b).unwrap()
}

fn tridiagonal_system() -> LinearSystem {
    let a = DMatrix::from_fn(6, 6, |i, j| {
        if i == j {
            4.0
        } else if i.abs_diff(j) == 1 {
            -1.0
        } else {
            0.0
        }
    });
    let b = DVector::from_vec(vec![1.0, -2.0, 3.0, 0.5, -1.0, 2.0]);
    LinearSystem::new(a, b).unwrap()
}

#[test]
fn diagonal_system_needs_one_undamped_jacobi_step() {
    let a = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 9.0]);
    let system = LinearSystem::new(a, DVector::from_vec(vec![4.0, 9.0])).unwrap();
    let options = SolverOptions::for_method(Method::Jacobi).with_relaxation(1.0);

    let solution = system.solve(Method::Jacobi, &options).unwrap();
    assert_eq!(solution.iterations(), 1);
    assert_eq!(solution.termination, Termination::Converged);
    assert_relative_eq!(solution.x, DVector::from_vec(vec![1.0, 1.0]), epsilon = 1e-14);
}

#[test]
fn descent_methods_solve_small_spd_system() {
    let a = DMatrix::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 2.0]);
    let system = LinearSystem::new(a, DVector::from_vec(vec![1.0, 1.0])).unwrap();
    let options = SolverOptions::default()
        .with_max_iterations(50)
        .with_epsilon(1e-6);

    for method in [Method::SteepestDescent, Method::ConjugateGradient] {
        let solution = system.solve(method, &options).unwrap();
        assert!(solution.converged());
        assert_relative_eq!(solution.x, DVector::from_vec(vec![1.0, 1.0]), epsilon = 1e-6);
    }
    let cg = system.solve(Method::ConjugateGradient, &options).unwrap();
    assert!(cg.iterations() <= 2);
}

/// Residual norms of CG on a well-conditioned SPD system never grow, and the exact solution
/// is reached after at most `n` iterations.
#[test]
fn conjugate_gradient_monotone_and_finite() {
    let system = tridiagonal_system();
    let options = SolverOptions::default().with_epsilon(1e-10);
    let solution = system.solve(Method::ConjugateGradient, &options).unwrap();

    assert!(solution.iterations() <= system.dimension());
    let mut previous = solution.history.initial_residual();
    for residual in solution.history.residuals() {
        assert!(*residual <= previous);
        previous = *residual;
    }
    assert!(system.residual_norm(&solution.x) < 1e-10);
}

#[test]
fn convergence_ratios_divide_consecutive_residuals() {
    let system = shifted_laplacian_system();
    for method in [Method::Jacobi, Method::GaussSeidel, Method::SteepestDescent] {
        let solution = system
            .solve(method, &SolverOptions::for_method(method))
            .unwrap();
        let history = &solution.history;
        let mut previous = history.initial_residual();
        for (residual, ratio) in history.residuals().iter().zip(history.ratios()) {
            assert_relative_eq!(*ratio, residual / previous, epsilon = 1e-12);
            previous = *residual;
        }
    }
}

#[test]
fn damped_jacobi_on_shifted_laplacian() {
    let system = shifted_laplacian_system();
    let options = SolverOptions::for_method(Method::Jacobi)
        .with_epsilon(1e-5)
        .with_relaxation(0.96);

    let solution = system.solve(Method::Jacobi, &options).unwrap();
    assert!(solution.converged());
    assert!(solution.relative_residual < 1e-5);
    assert_eq!(solution.relaxation, Some(0.96));
}

#[test]
fn block_splittings_converge_on_shifted_laplacian() {
    let system = shifted_laplacian_system();
    let options = SolverOptions::default()
        .with_epsilon(1e-5)
        .with_relaxation(0.7);

    let two_blocks = BlockPartition::contiguous(&[3, 7]).unwrap();
    let swapped = BlockPartition::contiguous(&[3, 4, 3])
        .unwrap()
        .with_swap(3, 7)
        .unwrap();

    for partition in [two_blocks, swapped] {
        let splitting = Splitting::block(system.matrix(), &partition).unwrap();
        assert!(splitting.reconstructs(system.matrix(), 1e-14));
        let solution = system.solve_with_splitting(&splitting, &options).unwrap();
        assert!(solution.converged());
        assert!(system.relative(system.residual_norm(&solution.x)) < 1e-5);
    }
}

#[test]
fn single_block_splitting_is_a_direct_solve() {
    let system = shifted_laplacian_system();
    let partition = BlockPartition::contiguous(&[10]).unwrap();
    let splitting = Splitting::block(system.matrix(), &partition).unwrap();
    assert_eq!(splitting.n().amax(), 0.0);

    let options = SolverOptions::default().with_epsilon(1e-10);
    let solution = system.solve_with_splitting(&splitting, &options).unwrap();
    assert_eq!(solution.iterations(), 1);
    assert!(solution.converged());
}

#[test]
fn zero_block_is_a_singular_splitting() {
    let a = DMatrix::from_row_slice(3, 3, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 3.0]);
    let system = LinearSystem::new(a, DVector::from_element(3, 1.0)).unwrap();
    let partition = BlockPartition::contiguous(&[2, 1]).unwrap();
    let splitting = Splitting::block(system.matrix(), &partition).unwrap();

    let result = system.solve_with_splitting(&splitting, &SolverOptions::default());
    assert!(matches!(result, Err(SolverError::SingularSplitting { .. })));
}

#[test]
fn terminal_policies_differ_by_family() {
    let system = tridiagonal_system();
    let tight = SolverOptions::default()
        .with_max_iterations(2)
        .with_epsilon(1e-14);

    let stationary = system.solve(Method::GaussSeidel, &tight).unwrap();
    assert_eq!(stationary.termination, Termination::BudgetExhausted);
    assert_eq!(stationary.iterations(), 2);

    let cg = system.solve(Method::ConjugateGradient, &tight).unwrap_err();
    assert_eq!(cg.history().map(|h| h.len()), Some(2));

    let gmres = system.solve(Method::Gmres1, &tight).unwrap();
    assert_eq!(gmres.termination, Termination::BudgetExhausted);
    assert_eq!(gmres.iterations(), 2);
}

#[test]
fn generated_spd_system_compares_all_methods() {
    let n = 50;
    let a = random_spd(n, 5.0 / n as f64, 2024).unwrap();
    let b = random_vector(n, 7);
    let system = LinearSystem::new(a, b).unwrap();

    let runs = compare_all(&system);
    assert_eq!(runs.len(), Method::ALL.len());

    let cg = runs
        .iter()
        .find(|run| run.method == Method::ConjugateGradient)
        .unwrap();
    let solution = cg.outcome.as_ref().unwrap();
    assert!(solution.converged());
    assert!(system.relative(system.residual_norm(&solution.x)) < 1e-2);

    let mut sink = TableSink::new();
    solution.report_to(&mut sink);
    assert!(sink.as_str().starts_with("# Conjugate Gradient"));
}
