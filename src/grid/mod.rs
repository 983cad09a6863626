//! Structured 2D grids with guard cells
//!
//! The numerical core never owns field storage. It reads and writes named
//! fields through the [`Grid`] trait, and asks the grid to refresh guard
//! cells after writing.
//!
//! # Layout
//!
//! A grid with `nx × ny` interior points stores every field as an
//! `(nx + 2) × (ny + 2)` array indexed `[i, j]`:
//!
//! ```text
//!   j = ny+1  ┌───┬───────────────┬───┐   guard row
//!             │   │               │   │
//!   j ∈ 1..ny │ g │   interior    │ g │
//!             │   │ [1,nx]×[1,ny] │   │
//!   j = 0     └───┴───────────────┴───┘   guard row
//!            i = 0               i = nx+1
//! ```
//!
//! # Example
//!
//! ```rust
//! use flowcore::grid::{Grid, GridLocation, StructuredGrid};
//!
//! let mut grid = StructuredGrid::new(GridLocation::Center, (4, 4), (0.0, 1.0), (0.0, 1.0))?;
//! grid.add_field("pres").add_field("rhs");
//! grid.set_interior("rhs", |x, y| x * y)?;
//! grid.fill_guard_cells("rhs")?;
//! assert_eq!(grid.values("rhs")?.dim(), (6, 6));
//! # Ok::<(), flowcore::FlowError>(())
//! ```

mod structured;
mod traits;

pub use structured::{GuardCondition, StructuredGrid};
pub use traits::{Grid, GridLocation};
