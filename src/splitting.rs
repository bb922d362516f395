//! Matrix splittings `A = M + N` consumed by the stationary engine.

use std::collections::HashSet;
use std::ops::Range;

use nalgebra::DMatrix;

use crate::error::{Result, SolverError};

/// A pair `(M, N)` with `A = M + N`; `M` is the part that gets inverted.
#[derive(Clone, Debug)]
pub struct Splitting {
    m: DMatrix<f64>,
    n: DMatrix<f64>,
}

impl Splitting {
    /// Wraps an arbitrary caller-supplied pair after checking that the shapes agree.
    pub fn new(m: DMatrix<f64>, n: DMatrix<f64>) -> Result<Self> {
        let order = m.nrows();
        if m.ncols() != order {
            return Err(SolverError::dimension_mismatch("M columns", order, m.ncols()));
        }
        if n.nrows() != order {
            return Err(SolverError::dimension_mismatch("N rows", order, n.nrows()));
        }
        if n.ncols() != order {
            return Err(SolverError::dimension_mismatch("N columns", order, n.ncols()));
        }
        Ok(Self { m, n })
    }

    /// Completes `M` into a splitting of `a` with `N = A − M`.
    pub fn from_preconditioner(a: &DMatrix<f64>, m: DMatrix<f64>) -> Result<Self> {
        if m.nrows() != a.nrows() {
            return Err(SolverError::dimension_mismatch("M rows", a.nrows(), m.nrows()));
        }
        if m.ncols() != a.ncols() {
            return Err(SolverError::dimension_mismatch("M columns", a.ncols(), m.ncols()));
        }
        let n = a - &m;
        Self::new(m, n)
    }

    /// Jacobi splitting: `M = D`, `N = L + U`.
    pub fn jacobi(a: &DMatrix<f64>) -> Self {
        let m = DMatrix::from_diagonal(&a.diagonal());
        let n = a - &m;
        Self { m, n }
    }

    /// Gauss-Seidel splitting: `M = D + L`, `N = U`.
    pub fn gauss_seidel(a: &DMatrix<f64>) -> Self {
        let m = a.lower_triangle();
        let n = a.upper_triangle() - DMatrix::from_diagonal(&a.diagonal());
        Self { m, n }
    }

    /// Block splitting: `M` keeps the entries coupling indices of the same block.
    ///
    /// Sub-block invertibility is not checked here; a singular block surfaces when the
    /// engine inverts `M`.
    pub fn block(a: &DMatrix<f64>, partition: &BlockPartition) -> Result<Self> {
        let order = a.nrows();
        if a.ncols() != order {
            return Err(SolverError::dimension_mismatch("matrix columns", order, a.ncols()));
        }
        if partition.dimension() != order {
            return Err(SolverError::dimension_mismatch(
                "partition dimension",
                order,
                partition.dimension(),
            ));
        }

        let mut m = DMatrix::zeros(order, order);
        for block in 0..partition.block_count() {
            let indices = partition.block_indices(block);
            for &i in indices {
                for &j in indices {
                    m[(i, j)] = a[(i, j)];
                }
            }
        }
        let n = a - &m;
        Ok(Self { m, n })
    }

    /// The inverted part `M`.
    pub fn m(&self) -> &DMatrix<f64> {
        &self.m
    }

    /// The remainder `N = A − M`.
    pub fn n(&self) -> &DMatrix<f64> {
        &self.n
    }

    /// Order of the split matrices.
    pub fn dimension(&self) -> usize {
        self.m.nrows()
    }

    /// Checks `M + N == A` elementwise within `tolerance`.
    pub fn reconstructs(&self, a: &DMatrix<f64>, tolerance: f64) -> bool {
        if a.shape() != self.m.shape() {
            return false;
        }
        (&self.m + &self.n)
            .iter()
            .zip(a.iter())
            .all(|(lhs, rhs)| (lhs - rhs).abs() <= tolerance)
    }
}

/// Grouping of the indices `0..n` into blocks for block splittings.
///
/// Blocks are contiguous ranges of *positions*; `permutation[p]` names the original index
/// sitting at position `p`. With the identity permutation the blocks are plain index
/// ranges, with a swap the two swapped indices trade blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockPartition {
    blocks: Vec<Range<usize>>,
    permutation: Vec<usize>,
    block_of: Vec<usize>,
}

impl BlockPartition {
    /// Builds consecutive blocks with the given sizes.
    pub fn contiguous(sizes: &[usize]) -> Result<Self> {
        let mut ranges = Vec::with_capacity(sizes.len());
        let mut start = 0usize;
        for &size in sizes {
            let end = start
                .checked_add(size)
                .ok_or_else(|| SolverError::invalid_partition("block sizes overflow usize"))?;
            ranges.push(start..end);
            start = end;
        }
        Self::from_ranges(ranges)
    }

    /// Builds a partition from explicit ranges, which must tile `0..n` in order.
    pub fn from_ranges(ranges: Vec<Range<usize>>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(SolverError::invalid_partition("at least one block is required"));
        }
        let mut expected_start = 0usize;
        for (index, range) in ranges.iter().enumerate() {
            if range.start != expected_start {
                return Err(SolverError::invalid_partition(format!(
                    "block {index} starts at {} but the previous block ended at {expected_start}",
                    range.start
                )));
            }
            if range.is_empty() {
                return Err(SolverError::invalid_partition(format!(
                    "block {index} is empty"
                )));
            }
            expected_start = range.end;
        }
        let n = expected_start;
        let mut partition = Self {
            blocks: ranges,
            permutation: (0..n).collect(),
            block_of: Vec::new(),
        };
        partition.index_blocks();
        Ok(partition)
    }

    /// Reorders indices: position `p` of the blocks holds original index `permutation[p]`.
    pub fn with_permutation(mut self, permutation: Vec<usize>) -> Result<Self> {
        let n = self.dimension();
        if permutation.len() != n {
            return Err(SolverError::dimension_mismatch(
                "permutation length",
                n,
                permutation.len(),
            ));
        }
        let mut seen = HashSet::with_capacity(n);
        for &index in &permutation {
            if index >= n || !seen.insert(index) {
                return Err(SolverError::invalid_partition(format!(
                    "permutation entry {index} is out of range or repeated"
                )));
            }
        }
        self.permutation = permutation;
        self.index_blocks();
        Ok(self)
    }

    /// Exchanges the positions of two indices, like swapping a row/column pair of `A`.
    pub fn with_swap(self, i: usize, j: usize) -> Result<Self> {
        let n = self.dimension();
        if i >= n || j >= n {
            return Err(SolverError::invalid_partition(format!(
                "cannot swap {i} and {j} in a partition of {n} indices"
            )));
        }
        let mut permutation = self.permutation.clone();
        permutation.swap(i, j);
        self.with_permutation(permutation)
    }

    fn index_blocks(&mut self) {
        let mut block_of = vec![0usize; self.permutation.len()];
        for (block, range) in self.blocks.iter().enumerate() {
            for position in range.clone() {
                block_of[self.permutation[position]] = block;
            }
        }
        self.block_of = block_of;
    }

    /// Number of indices covered.
    pub fn dimension(&self) -> usize {
        self.permutation.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Position ranges of the blocks.
    pub fn blocks(&self) -> &[Range<usize>] {
        &self.blocks
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Original indices belonging to block `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block >= self.block_count()`.
    pub fn block_indices(&self, block: usize) -> &[usize] {
        &self.permutation[self.blocks[block].clone()]
    }

    /// Block containing original index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.dimension()`.
    pub fn block_of(&self, index: usize) -> usize {
        self.block_of[index]
    }
}
