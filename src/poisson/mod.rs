//! Discrete Poisson solver
//!
//! Solves `∇²φ = f` on the interior of a structured grid with a direct
//! (non-iterative) factorization of the assembled 5-point operator.
//!
//! # Module Organization
//!
//! - **`operator`**: sparse assembly of the discrete Laplacian
//!   - `SparseOperatorBuilder`: interior-only 5-point stencil in CSR form
//!   - `BoundaryClosure`: how missing neighbours at the domain edge are closed
//!   - `stencil_row`: the single rule that encodes the closure
//!
//! - **`traits`**: solver contract and configuration
//!   - `PoissonSolver` trait
//!   - `PoissonConfiguration`: verbosity and closure
//!   - `SolveReport`: residual and system size
//!
//! - **`banded`**: LU factorization in band storage
//! - **`direct`**: direct solver on top of the banded factors
//!
//! # Workflow
//!
//! ```text
//! rhs field ──flatten──► b ─┐
//!                           ├─► LU solve ─► x ──scatter──► solution field ─► guard fill
//! (nx, ny, dx) ─assemble─► A ┘                  │
//!                                               └─► residual = ‖A·x − b‖₂
//! ```
//!
//! # Example
//!
//! ```rust
//! use flowcore::grid::{Grid, GridLocation, StructuredGrid};
//! use flowcore::poisson::{BoundaryClosure, DirectPoissonSolver, PoissonConfiguration, PoissonSolver};
//!
//! let mut grid = StructuredGrid::new(GridLocation::Center, (8, 8), (0.0, 1.0), (0.0, 1.0))?;
//! grid.add_field("pres").add_field("rhs");
//! grid.set_interior("rhs", |x, y| x * y)?;
//!
//! let config = PoissonConfiguration::default().with_closure(BoundaryClosure::ZeroDirichlet);
//! let report = DirectPoissonSolver::with_config(config).solve(&mut grid, "pres", "rhs")?;
//! assert!(report.residual < 1e-10);
//! # Ok::<(), flowcore::FlowError>(())
//! ```
//!
//! # Singular systems
//!
//! With the default [`BoundaryClosure::Implicit`] every row sums to zero, so
//! the operator has the constant vector in its null space. The direct solve
//! accepts right-hand sides that are compatible with that (their interior
//! sum vanishes), pins one unknown to zero and returns that particular
//! solution. Incompatible right-hand sides, including any non-zero value on
//! a single-cell grid, fail with [`crate::FlowError::LinearSystemSingular`].

mod banded;
mod direct;
mod operator;
mod traits;

use std::sync::atomic::{AtomicUsize, Ordering};

pub use direct::{solve_direct, DirectPoissonSolver};
pub use operator::{
    linear_index, stencil_row, BoundaryClosure, CsrMatrix, SparseOperatorBuilder, StencilRow,
};
pub use traits::{PoissonConfiguration, PoissonSolver, SolveReport};

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Sparse mat-vec products switch to Rayon above this many rows, and only
// when the crate is compiled with the `parallel` feature.

/// Default row count above which mat-vec products run in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// # Example
///
/// ```rust
/// use flowcore::poisson::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Saves the current threshold on construction and restores it on drop.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the setter so restoring never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}
