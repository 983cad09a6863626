//! Direct (LU-based) Poisson solver
//!
//! # Algorithm
//!
//! 1. Flatten the interior of the right-hand side field into `b` using the
//!    operator ordering `(i - 1) * ny + (j - 1)`.
//! 2. Assemble `A` with [`SparseOperatorBuilder`].
//! 3. Factor `A = L·U` in band storage of half-width `ny` and solve by
//!    substitution.
//! 4. Residual `‖A·x − b‖₂` from the sparse operator.
//! 5. Scatter `x` back into the interior and refresh the guard cells.
//!
//! # Rank deficiency
//!
//! A pivot below `√ε · max|A|` is treated as zero. If the reduced
//! right-hand side at that pivot is negligible too, the system is consistent
//! and the matching unknown is pinned to zero. Otherwise the solve fails with
//! [`FlowError::LinearSystemSingular`].

use nalgebra::DVector;
use ndarray::{s, Array2};

use crate::error::{FlowError, FlowResult};
use crate::grid::Grid;
use crate::poisson::banded::BandedLu;
use crate::poisson::operator::{CsrMatrix, SparseOperatorBuilder};
use crate::poisson::traits::{PoissonConfiguration, PoissonSolver, SolveReport};

// =================================================================================================
// Direct Poisson Solver
// =================================================================================================

/// Poisson solver using an exact LU factorization
///
/// No tolerance, no iteration cap: the answer is exact up to round-off.
///
/// # Example
///
/// ```rust
/// use flowcore::grid::{Grid, GridLocation, StructuredGrid};
/// use flowcore::poisson::{DirectPoissonSolver, PoissonSolver};
///
/// let mut grid = StructuredGrid::new(GridLocation::Center, (4, 4), (0.0, 1.0), (0.0, 1.0))?;
/// grid.add_field("pres").add_field("rhs");
///
/// let report = DirectPoissonSolver::new().solve(&mut grid, "pres", "rhs")?;
/// assert_eq!(report.unknowns, 16);
/// assert_eq!(report.residual, 0.0);
/// # Ok::<(), flowcore::FlowError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPoissonSolver {
    config: PoissonConfiguration,
}

impl DirectPoissonSolver {
    /// Solver with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with an explicit configuration
    pub fn with_config(config: PoissonConfiguration) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &PoissonConfiguration {
        &self.config
    }
}

impl PoissonSolver for DirectPoissonSolver {
    fn solve(&self, grid: &mut dyn Grid, ivar: &str, rvar: &str) -> FlowResult<SolveReport> {
        let (nx, ny) = (grid.nx(), grid.ny());

        // Fail on a missing solution field before doing any work
        grid.values(ivar)?;
        let rhs = flatten_interior(grid.values(rvar)?, nx, ny);

        let operator = SparseOperatorBuilder::from_grid(&*grid)?
            .with_closure(self.config.closure)
            .build();

        let solution = solve_direct(&operator, &rhs)?;
        let residual = (operator.mul_vec(&solution) - &rhs).norm();

        scatter_interior(grid.values_mut(ivar)?, &solution, nx, ny);
        grid.fill_guard_cells(ivar)?;

        log::debug!(
            "direct Poisson solve: {} unknowns, {} nonzeros, residual {:e}",
            operator.n_rows(),
            operator.nnz(),
            residual
        );
        if self.config.verbose {
            log::info!("Direct Solver:");
            log::info!("- Final residual: {}", residual);
        }

        Ok(SolveReport {
            residual,
            unknowns: operator.n_rows(),
            nnz: operator.nnz(),
        })
    }

    fn name(&self) -> &'static str {
        "Direct Solver"
    }
}

// =================================================================================================
// Factorization
// =================================================================================================

/// Solve `A·x = b` exactly with a banded LU factorization of `A`
///
/// # Errors
///
/// `LinearSystemSingular` when `A` is rank deficient and `b` is not in its
/// range. Consistent rank-deficient systems return the solution whose
/// unknown at the zero pivot is set to zero.
pub fn solve_direct(operator: &CsrMatrix, rhs: &DVector<f64>) -> FlowResult<DVector<f64>> {
    assert_eq!(rhs.len(), operator.n_rows(), "right-hand side length must match operator size");
    BandedLu::factor(operator)?.solve(rhs)
}

fn flatten_interior(field: &Array2<f64>, nx: usize, ny: usize) -> DVector<f64> {
    DVector::from_iterator(nx * ny, field.slice(s![1..=nx, 1..=ny]).iter().copied())
}

fn scatter_interior(field: &mut Array2<f64>, values: &DVector<f64>, nx: usize, ny: usize) {
    for (dst, src) in field.slice_mut(s![1..=nx, 1..=ny]).iter_mut().zip(values.iter()) {
        *dst = *src;
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridLocation, StructuredGrid};
    use crate::poisson::operator::BoundaryClosure;
    use approx::assert_relative_eq;

    fn grid_with_fields(nx: usize, ny: usize) -> StructuredGrid {
        let mut grid = StructuredGrid::new(
            GridLocation::Center,
            (nx, ny),
            (0.0, nx as f64),
            (0.0, ny as f64),
        )
        .unwrap();
        grid.add_field("phi").add_field("rhs");
        grid
    }

    #[test]
    fn test_solver_name() {
        assert_eq!(DirectPoissonSolver::new().name(), "Direct Solver");
    }

    #[test]
    fn test_flatten_follows_operator_ordering() {
        let mut field = Array2::<f64>::zeros((4, 5));
        for i in 1..=2 {
            for j in 1..=3 {
                field[[i, j]] = (10 * i + j) as f64;
            }
        }
        let flat = flatten_interior(&field, 2, 3);
        assert_eq!(flat.as_slice(), &[11.0, 12.0, 13.0, 21.0, 22.0, 23.0]);
    }

    #[test]
    fn test_scatter_inverts_flatten() {
        let values = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut field = Array2::from_elem((4, 5), -1.0);
        scatter_interior(&mut field, &values, 2, 3);
        assert_eq!(field[[1, 1]], 1.0);
        assert_eq!(field[[1, 3]], 3.0);
        assert_eq!(field[[2, 1]], 4.0);
        assert_eq!(field[[0, 0]], -1.0);
        assert_eq!(flatten_interior(&field, 2, 3), values);
    }

    #[test]
    fn test_solve_direct_nonsingular() {
        let operator = SparseOperatorBuilder::new(3, 3, 1.0, 1.0)
            .unwrap()
            .with_closure(BoundaryClosure::ZeroDirichlet)
            .build();
        let expected = DVector::from_fn(9, |r, _| 1.0 + r as f64);
        let rhs = operator.mul_vec(&expected);
        let x = solve_direct(&operator, &rhs).unwrap();
        assert!((x - expected).amax() < 1e-12);
    }

    #[test]
    fn test_single_cell_nonzero_rhs_is_singular() {
        let operator = SparseOperatorBuilder::new(1, 1, 1.0, 1.0).unwrap().build();
        let rhs = DVector::from_element(1, 2.5);
        assert_eq!(
            solve_direct(&operator, &rhs).unwrap_err(),
            FlowError::LinearSystemSingular { size: 1, pivot: 0 }
        );
    }

    #[test]
    fn test_single_cell_zero_rhs_gives_zero() {
        let operator = SparseOperatorBuilder::new(1, 1, 1.0, 1.0).unwrap().build();
        let x = solve_direct(&operator, &DVector::zeros(1)).unwrap();
        assert_eq!(x[0], 0.0);
    }

    #[test]
    fn test_incompatible_rhs_is_singular() {
        // Constant forcing is orthogonal to the range of the implicit operator
        let operator = SparseOperatorBuilder::new(3, 3, 1.0, 1.0).unwrap().build();
        let rhs = DVector::from_element(9, 1.0);
        assert!(matches!(
            solve_direct(&operator, &rhs),
            Err(FlowError::LinearSystemSingular { size: 9, .. })
        ));
    }

    #[test]
    fn test_compatible_rhs_recovers_solution_up_to_constant() {
        let operator = SparseOperatorBuilder::new(4, 3, 1.0, 1.0).unwrap().build();
        let expected = DVector::from_fn(12, |r, _| (r as f64 * 0.7).cos());
        let rhs = operator.mul_vec(&expected);

        let x = solve_direct(&operator, &rhs).unwrap();
        let shift = &x - &expected;
        let offset = shift[0];
        assert!(shift.iter().all(|d| (d - offset).abs() < 1e-10));
        assert!((operator.mul_vec(&x) - rhs).norm() < 1e-10);
    }

    #[test]
    fn test_zero_rhs_gives_zero_field() {
        let mut grid = grid_with_fields(5, 4);
        grid.values_mut("phi").unwrap().fill(7.0);

        let report = DirectPoissonSolver::new().solve(&mut grid, "phi", "rhs").unwrap();
        assert_eq!(report.residual, 0.0);
        assert!(grid.interior("phi").unwrap().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_solution_written_with_guard_cells() {
        let mut grid = grid_with_fields(3, 3);
        grid.set_interior("rhs", |_, _| 1.0).unwrap();

        let config = PoissonConfiguration::default().with_closure(BoundaryClosure::ZeroDirichlet);
        let report = DirectPoissonSolver::with_config(config)
            .solve(&mut grid, "phi", "rhs")
            .unwrap();

        assert_eq!(report.unknowns, 9);
        assert_eq!(report.nnz, 33);
        assert!(report.residual < 1e-10);

        let phi = grid.values("phi").unwrap();
        for (i, j) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            assert_relative_eq!(phi[[i, j]], -0.6875, epsilon = 1e-12);
        }
        for (i, j) in [(1, 2), (2, 1), (2, 3), (3, 2)] {
            assert_relative_eq!(phi[[i, j]], -0.875, epsilon = 1e-12);
        }
        assert_relative_eq!(phi[[2, 2]], -1.125, epsilon = 1e-12);
        // Neumann guard fill copies the adjacent interior value
        assert_eq!(phi[[0, 2]], phi[[1, 2]]);
        assert_eq!(phi[[4, 3]], phi[[3, 3]]);
    }

    #[test]
    fn test_large_grid_solves_without_dense_factorization() {
        // 96 × 96 = 9216 unknowns; a dense factorization would need ~680 MB
        let mut grid = StructuredGrid::new(GridLocation::Center, (96, 96), (0.0, 1.0), (0.0, 1.0))
            .unwrap();
        grid.add_field("phi").add_field("rhs");
        grid.set_interior("rhs", |x, y| (x - 0.5) * (y - 0.3)).unwrap();

        let config = PoissonConfiguration::default().with_closure(BoundaryClosure::ZeroDirichlet);
        let report = DirectPoissonSolver::with_config(config)
            .solve(&mut grid, "phi", "rhs")
            .unwrap();

        assert_eq!(report.unknowns, 9216);
        assert!(report.residual < 1e-8, "residual {}", report.residual);
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let mut grid = grid_with_fields(2, 2);
        let solver = DirectPoissonSolver::new();
        assert_eq!(
            solver.solve(&mut grid, "pres", "rhs").unwrap_err(),
            FlowError::UnknownField("pres".to_string())
        );
        assert_eq!(
            solver.solve(&mut grid, "phi", "div").unwrap_err(),
            FlowError::UnknownField("div".to_string())
        );
    }

    #[test]
    fn test_singular_failure_leaves_solution_untouched() {
        let mut grid = grid_with_fields(1, 1);
        grid.values_mut("phi").unwrap().fill(3.0);
        grid.set_interior("rhs", |_, _| 1.0).unwrap();

        let result = DirectPoissonSolver::new().solve(&mut grid, "phi", "rhs");
        assert!(matches!(result, Err(FlowError::LinearSystemSingular { .. })));
        assert!(grid.values("phi").unwrap().iter().all(|v| *v == 3.0));
    }
}
