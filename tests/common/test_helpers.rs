//! Helper functions for integration tests

use nalgebra::DVector;
use ndarray::Array2;

use flowcore::grid::{Grid, GridLocation, StructuredGrid};
use flowcore::poisson::{linear_index, BoundaryClosure, SparseOperatorBuilder};

/// Cell-centered grid on `[0, lx] × [0, ly]` with the given fields
pub fn cell_grid(nx: usize, ny: usize, lx: f64, ly: f64, fields: &[&str]) -> StructuredGrid {
    let mut grid = StructuredGrid::new(GridLocation::Center, (nx, ny), (0.0, lx), (0.0, ly))
        .expect("valid grid");
    for name in fields {
        grid.add_field(name);
    }
    grid
}

/// X-face and y-face grids on the unit square with the given fields
pub fn face_grids(n: usize, fields: &[&str]) -> (StructuredGrid, StructuredGrid) {
    let mut grid_x = StructuredGrid::new(GridLocation::XFace, (n, n), (0.0, 1.0), (0.0, 1.0))
        .expect("valid grid");
    let mut grid_y = StructuredGrid::new(GridLocation::YFace, (n, n), (0.0, 1.0), (0.0, 1.0))
        .expect("valid grid");
    for name in fields {
        grid_x.add_field(name);
        grid_y.add_field(name);
    }
    (grid_x, grid_y)
}

/// Interior of a field flattened in solver order
pub fn interior_vector(grid: &dyn Grid, name: &str) -> DVector<f64> {
    let (nx, ny) = (grid.nx(), grid.ny());
    let values = grid.values(name).expect("field exists");
    let mut out = DVector::<f64>::zeros(nx * ny);
    for i in 1..=nx {
        for j in 1..=ny {
            out[linear_index(i, j, ny)] = values[[i, j]];
        }
    }
    out
}

/// Write `A·exact` into the interior of `rvar`
///
/// Makes `exact` the discrete solution of the system the solver assembles.
pub fn manufactured_rhs(grid: &mut StructuredGrid, exact: &str, rvar: &str, closure: BoundaryClosure) {
    let (nx, ny) = (grid.nx(), grid.ny());
    let operator = SparseOperatorBuilder::from_grid(&*grid)
        .expect("valid grid")
        .with_closure(closure)
        .build();
    let rhs = operator.mul_vec(&interior_vector(&*grid, exact));

    let values = grid.values_mut(rvar).expect("field exists");
    for i in 1..=nx {
        for j in 1..=ny {
            values[[i, j]] = rhs[linear_index(i, j, ny)];
        }
    }
}

/// Assert two arrays agree element-wise within `tolerance`
pub fn assert_fields_close(actual: &Array2<f64>, expected: &Array2<f64>, tolerance: f64, message: &str) {
    assert_eq!(actual.dim(), expected.dim(), "{}: Dimension mismatch", message);

    for ((index, &a), &e) in actual.indexed_iter().zip(expected.iter()) {
        let diff = (a - e).abs();
        assert!(
            diff < tolerance,
            "{}: Element {:?} differs by {} (tolerance {})",
            message, index, diff, tolerance
        );
    }
}
