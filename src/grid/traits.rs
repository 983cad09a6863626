//! Grid access contract

use ndarray::Array2;

use crate::error::FlowResult;

/// Where the values of a grid live inside each cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridLocation {
    /// Cell centers (pressure, divergence, level set on centers)
    Center,

    /// East faces of the cells (x-velocity)
    XFace,

    /// North faces of the cells (y-velocity)
    YFace,
}

impl GridLocation {
    /// Offset of storage index `i` (resp. `j`) in units of spacing, per axis
    ///
    /// Storage index 1 is the first interior point. A cell center sits half a
    /// spacing inside the domain, a face sits on the cell's upper edge.
    pub fn offsets(&self) -> [f64; 2] {
        match self {
            GridLocation::Center => [-0.5, -0.5],
            GridLocation::XFace => [0.0, -0.5],
            GridLocation::YFace => [-0.5, 0.0],
        }
    }
}

/// Read/write access to a structured grid
///
/// # Contract
///
/// - `nx`, `ny` are interior sizes; every field is `(nx + 2) × (ny + 2)`.
/// - The interior region is `[1, nx] × [1, ny]`, indices `0` and `n + 1`
///   are guard cells.
/// - `values_mut` hands out the whole array, guard cells included. Writers
///   call `fill_guard_cells` afterwards.
///
/// The trait is object safe so immersed boundary kernels can take
/// `&mut dyn Grid`.
pub trait Grid {
    /// Number of interior points along x
    fn nx(&self) -> usize;

    /// Number of interior points along y
    fn ny(&self) -> usize;

    /// Uniform spacing along x
    fn dx(&self) -> f64;

    /// Uniform spacing along y
    fn dy(&self) -> f64;

    /// Physical coordinates of storage index `(i, j)`, guard cells included
    fn point(&self, i: usize, j: usize) -> [f64; 2];

    /// Borrow a named field
    fn values(&self, name: &str) -> FlowResult<&Array2<f64>>;

    /// Borrow a named field mutably
    fn values_mut(&mut self, name: &str) -> FlowResult<&mut Array2<f64>>;

    /// Refresh the guard cells of a named field from its interior
    fn fill_guard_cells(&mut self, name: &str) -> FlowResult<()>;
}
