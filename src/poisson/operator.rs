//! Sparse assembly of the 5-point discrete Laplacian
//!
//! # Ordering
//!
//! One unknown per interior cell. Cell `(i, j)` with `i ∈ [1, nx]`,
//! `j ∈ [1, ny]` maps to row `(i - 1) * ny + (j - 1)`: `i` is the outer
//! index, `j` the inner one.
//!
//! # Stencil
//!
//! Each existing interior neighbour among `(i, j±1)`, `(i±1, j)` receives
//! the coefficient `1/dx²`. The diagonal is the negated sum of those
//! coefficients. Neighbours outside `[1, nx] × [1, ny]` get no entry at all,
//! which closes the boundary implicitly (zero normal derivative). The rule
//! lives in [`stencil_row`] so other closures can be swapped in without
//! touching the solve.
//!
//! The coefficient uses `dx` along both axes. Grids with `dx != dy` are
//! assembled as-is and reported through `log::warn!`.

use nalgebra::{DMatrix, DVector};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{FlowError, FlowResult};
use crate::grid::Grid;

// =================================================================================================
// Boundary closure
// =================================================================================================

/// Treatment of stencil neighbours that fall outside the interior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryClosure {
    /// Missing neighbour ⇒ no entry and no diagonal contribution.
    ///
    /// Every row sums to zero; the operator is singular with the constant
    /// vector as null space.
    #[default]
    Implicit,

    /// Missing neighbour ⇒ no entry, but the diagonal still receives
    /// `-1/dx²` (ghost value held at zero). Non-singular.
    ZeroDirichlet,
}

/// One assembled operator row
#[derive(Debug, Clone, PartialEq)]
pub struct StencilRow {
    /// Linear index of the cell
    pub row: usize,

    /// Diagonal coefficient
    pub diagonal: f64,

    /// Off-diagonal `(column, coefficient)` pairs in increasing column order
    pub neighbors: Vec<(usize, f64)>,
}

/// Linear index of interior cell `(i, j)` (1-based grid indices)
#[inline]
pub fn linear_index(i: usize, j: usize, ny: usize) -> usize {
    (i - 1) * ny + (j - 1)
}

/// Stencil of interior cell `(i, j)` under a boundary closure
///
/// This is the only place that decides which neighbours exist and what the
/// diagonal becomes when some are missing.
pub fn stencil_row(
    i: usize,
    j: usize,
    nx: usize,
    ny: usize,
    dx: f64,
    closure: BoundaryClosure,
) -> StencilRow {
    let row = linear_index(i, j, ny);
    let coeff = 1.0 / (dx * dx);

    // Candidates in increasing column order: i-1, j-1, j+1, i+1
    let candidates = [
        (i > 1, row.wrapping_sub(ny)),
        (j > 1, row.wrapping_sub(1)),
        (j < ny, row + 1),
        (i < nx, row + ny),
    ];

    let mut neighbors = Vec::with_capacity(4);
    let mut missing = 0usize;
    for (exists, column) in candidates {
        if exists {
            neighbors.push((column, coeff));
        } else {
            missing += 1;
        }
    }

    let mut diagonal = -neighbors.iter().map(|(_, c)| c).sum::<f64>();
    if closure == BoundaryClosure::ZeroDirichlet {
        diagonal -= missing as f64 * coeff;
    }

    StencilRow { row, diagonal, neighbors }
}

// =================================================================================================
// Compressed sparse row matrix
// =================================================================================================

/// Square matrix in compressed sparse row form
///
/// Column indices are sorted inside each row. Built once per solve and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Number of rows (and columns)
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n
    }

    /// Number of stored entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column indices and values of one row
    #[inline]
    pub fn row(&self, r: usize) -> (&[usize], &[f64]) {
        let range = self.row_ptr[r]..self.row_ptr[r + 1];
        (&self.col_idx[range.clone()], &self.values[range])
    }

    /// Stored coefficient at `(r, c)`, zero when absent
    pub fn get(&self, r: usize, c: usize) -> f64 {
        let (cols, vals) = self.row(r);
        match cols.binary_search(&c) {
            Ok(k) => vals[k],
            Err(_) => 0.0,
        }
    }

    /// Check whether `(r, c)` is stored
    pub fn has_entry(&self, r: usize, c: usize) -> bool {
        self.row(r).0.binary_search(&c).is_ok()
    }

    /// Diagonal coefficient of row `r`
    #[inline]
    pub fn diagonal(&self, r: usize) -> f64 {
        self.get(r, r)
    }

    /// Largest `|c - r|` over stored entries
    ///
    /// `ny` for an assembled Laplacian with more than one column of cells.
    pub fn bandwidth(&self) -> usize {
        (0..self.n)
            .flat_map(|r| self.row(r).0.iter().map(move |&c| c.abs_diff(r)))
            .max()
            .unwrap_or(0)
    }

    #[inline]
    fn row_dot(&self, r: usize, x: &[f64]) -> f64 {
        let (cols, vals) = self.row(r);
        cols.iter().zip(vals).map(|(&c, &v)| v * x[c]).sum()
    }

    /// Sparse product `A · x`
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(x.len(), self.n, "vector length must match matrix size");
        let xs = x.as_slice();
        let mut y = DVector::<f64>::zeros(self.n);

        #[cfg(feature = "parallel")]
        {
            if self.n > super::parallel_threshold() {
                y.as_mut_slice()
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(r, out)| *out = self.row_dot(r, xs));
                return y;
            }
        }

        for (r, out) in y.iter_mut().enumerate() {
            *out = self.row_dot(r, xs);
        }
        y
    }

    /// Check `|A[r, c] - A[c, r]| <= tolerance` for every stored entry
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.n).all(|r| {
            let (cols, vals) = self.row(r);
            cols.iter()
                .zip(vals)
                .all(|(&c, &v)| (v - self.get(c, r)).abs() <= tolerance)
        })
    }

    /// Dense copy, for inspection and comparison
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::<f64>::zeros(self.n, self.n);
        for r in 0..self.n {
            let (cols, vals) = self.row(r);
            for (&c, &v) in cols.iter().zip(vals) {
                dense[(r, c)] = v;
            }
        }
        dense
    }
}

// =================================================================================================
// Operator builder
// =================================================================================================

/// Assembles the interior Laplacian of an `nx × ny` grid
///
/// # Example
///
/// ```rust
/// use flowcore::poisson::SparseOperatorBuilder;
///
/// let operator = SparseOperatorBuilder::new(3, 3, 1.0, 1.0)?.build();
/// assert_eq!(operator.n_rows(), 9);
/// assert_eq!(operator.diagonal(4), -4.0);  // center cell
/// assert_eq!(operator.diagonal(0), -2.0);  // corner cell
/// # Ok::<(), flowcore::FlowError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseOperatorBuilder {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    closure: BoundaryClosure,
}

impl SparseOperatorBuilder {
    /// Builder with the implicit boundary closure
    ///
    /// # Errors
    ///
    /// `InvalidGrid` when a size is zero or a spacing is not positive.
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> FlowResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(FlowError::InvalidGrid(format!(
                "operator needs at least one interior cell, got {}x{}", nx, ny
            )));
        }
        if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
            return Err(FlowError::InvalidGrid(format!(
                "spacing must be positive, got dx={} dy={}", dx, dy
            )));
        }
        Ok(Self { nx, ny, dx, dy, closure: BoundaryClosure::Implicit })
    }

    /// Builder sized from a grid
    pub fn from_grid<G: Grid + ?Sized>(grid: &G) -> FlowResult<Self> {
        Self::new(grid.nx(), grid.ny(), grid.dx(), grid.dy())
    }

    /// Replace the boundary closure
    pub fn with_closure(mut self, closure: BoundaryClosure) -> Self {
        self.closure = closure;
        self
    }

    /// Number of unknowns
    pub fn size(&self) -> usize {
        self.nx * self.ny
    }

    /// Assemble the operator directly into CSR form
    pub fn build(&self) -> CsrMatrix {
        if (self.dx - self.dy).abs() > 1e-12 * self.dx.max(self.dy) {
            log::warn!(
                "Poisson operator assembled with dx={} for both axes, grid has dy={}",
                self.dx, self.dy
            );
        }

        let n = self.size();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::with_capacity(5 * n);
        let mut values = Vec::with_capacity(5 * n);
        row_ptr.push(0);

        for i in 1..=self.nx {
            for j in 1..=self.ny {
                let stencil = stencil_row(i, j, self.nx, self.ny, self.dx, self.closure);

                // Merge the diagonal into the sorted neighbour list
                let mut diagonal_pending = true;
                for &(column, coeff) in &stencil.neighbors {
                    if diagonal_pending && column > stencil.row {
                        col_idx.push(stencil.row);
                        values.push(stencil.diagonal);
                        diagonal_pending = false;
                    }
                    col_idx.push(column);
                    values.push(coeff);
                }
                if diagonal_pending {
                    col_idx.push(stencil.row);
                    values.push(stencil.diagonal);
                }

                row_ptr.push(col_idx.len());
            }
        }

        CsrMatrix { n, row_ptr, col_idx, values }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
