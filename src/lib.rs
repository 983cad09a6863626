//! flowcore: Poisson and Immersed Boundary Core for Incompressible Flow
//!
//! Numerical building blocks for a staggered-grid incompressible flow solver:
//! a direct Poisson solve for the pressure equation and an immersed boundary
//! component that couples rigid bodies to the flow.
//!
//! # Architecture
//!
//! flowcore is built on two core principles:
//!
//! 1. **Separation of Storage and Numerics**
//!    - Grids own named fields and guard cells (where values live)
//!    - Solvers and kernels read and write fields by name (what is done to them)
//!
//! 2. **Decisions Made Once**
//!    - Configurations are validated when they are built
//!    - The immersed boundary strategy is bound at construction
//!
//! # Quick Start
//!
//! ```rust
//! use flowcore::prelude::*;
//!
//! # fn main() -> Result<(), FlowError> {
//! // 1. Cell-centered grid holding pressure and its right-hand side
//! let mut grid = StructuredGrid::new(GridLocation::Center, (8, 8), (0.0, 1.0), (0.0, 1.0))?;
//! grid.add_field("pres").add_field("rhs");
//! grid.set_interior("rhs", |x, y| (x - 0.5) * (y - 0.5))?;
//!
//! // 2. Configure and run the direct solver
//! let config = PoissonConfiguration::default().with_closure(BoundaryClosure::ZeroDirichlet);
//! let solver = DirectPoissonSolver::with_config(config);
//! let report = solver.solve(&mut grid, "pres", "rhs")?;
//!
//! // 3. Inspect the outcome
//! assert_eq!(report.unknowns, 64);
//! assert!(report.residual < 1e-10);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`grid`]: Structured grids with named fields and guard cells
//! - [`poisson`]: Sparse Laplacian assembly and direct Poisson solve
//! - [`imbound`]: Immersed boundary dispatcher and kernels
//! - [`particles`]: Rigid bodies immersed in the flow
//!
//! # Features
//!
//! - `parallel`: rayon-backed sparse matrix-vector products above
//!   [`poisson::parallel_threshold`]

// Core modules
pub mod error;
pub mod grid;
pub mod poisson;

pub mod imbound;
pub mod particles;

mod config;
mod scalars;

pub use config::SimulationOptions;
pub use error::{FlowError, FlowResult};
pub use scalars::Scalars;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //!
    //! use flowcore::prelude::*;
    //! ```
    pub use crate::error::{FlowError, FlowResult};
    pub use crate::grid::{Grid,
                          GridLocation,
                          GuardCondition,
                          StructuredGrid};
    pub use crate::imbound::{IbConfiguration,
                             ImmersedBoundary,
                             ImmersedBoundaryKernels};
    pub use crate::particles::{Circle,
                               ImmersedBody,
                               Particles};
    pub use crate::poisson::{BoundaryClosure,
                             DirectPoissonSolver,
                             PoissonConfiguration,
                             PoissonSolver,
                             SolveReport};
    pub use crate::{Scalars, SimulationOptions};
}
