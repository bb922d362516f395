//! Test-matrix builders for experiments and benchmarks.

use nalgebra::{DMatrix, DVector};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution, Uniform};

use crate::error::{Result, SolverError};

/// Edges of the ten-node graph whose Laplacian drives the block-splitting experiments.
const TEN_NODE_EDGES: [(usize, usize); 17] = [
    (0, 1),
    (0, 2),
    (1, 2),
    (2, 3),
    (3, 4),
    (3, 6),
    (3, 8),
    (3, 9),
    (4, 5),
    (4, 6),
    (4, 7),
    (5, 6),
    (5, 7),
    (6, 7),
    (6, 9),
    (7, 9),
    (8, 9),
];

/// Random symmetric positive-definite matrix `SᵀVS + 0.1·I`.
///
/// `S` has each entry present with probability `density` and uniform on `[0, 1)`, `V` is a
/// diagonal of uniform `[0, 1)` weights. The shift keeps the matrix definite even when `S`
/// is rank deficient.
pub fn random_spd(n: usize, density: f64, seed: u64) -> Result<DMatrix<f64>> {
    if !(density > 0.0 && density <= 1.0) {
        return Err(SolverError::invalid_option("density", density));
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let present = Bernoulli::new(density)
        .map_err(|_| SolverError::invalid_option("density", density))?;
    let unit = Uniform::new(0.0, 1.0);

    let s = DMatrix::from_fn(n, n, |_, _| {
        if present.sample(&mut rng) {
            unit.sample(&mut rng)
        } else {
            0.0
        }
    });
    let weights = DVector::from_fn(n, |_, _| unit.sample(&mut rng));

    let weighted = DMatrix::from_diagonal(&weights) * &s;
    let mut a = s.transpose() * weighted;
    for i in 0..n {
        a[(i, i)] += 0.1;
    }
    Ok(a)
}

/// Density giving about five stored entries per row.
pub fn default_density(n: usize) -> f64 {
    if n == 0 {
        1.0
    } else {
        (5.0 / n as f64).min(1.0)
    }
}

/// Vector with entries uniform on `[0, 1)`.
pub fn random_vector(n: usize, seed: u64) -> DVector<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let unit = Uniform::new(0.0, 1.0);
    DVector::from_fn(n, |_, _| unit.sample(&mut rng))
}

/// Laplacian `D − Adj` of an undirected graph on `n` nodes.
pub fn graph_laplacian(n: usize, edges: &[(usize, usize)]) -> Result<DMatrix<f64>> {
    for &(i, j) in edges {
        if i >= n || j >= n {
            return Err(SolverError::dimension_mismatch("edge endpoint", n, i.max(j)));
        }
        if i == j {
            return Err(SolverError::invalid_option("self-loop node", i as f64));
        }
    }
    Ok(laplacian(n, edges))
}

/// Laplacian of the fixed ten-node test graph.
pub fn ten_node_laplacian() -> DMatrix<f64> {
    laplacian(10, &TEN_NODE_EDGES)
}

fn laplacian(n: usize, edges: &[(usize, usize)]) -> DMatrix<f64> {
    let mut l = DMatrix::zeros(n, n);
    for &(i, j) in edges {
        l[(i, j)] -= 1.0;
        l[(j, i)] -= 1.0;
        l[(i, i)] += 1.0;
        l[(j, j)] += 1.0;
    }
    l
}
