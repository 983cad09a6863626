//! Immersed boundary coupling
//!
//! One stable two-operation contract, [`ImmersedBoundary::map_to_grid`] and
//! [`ImmersedBoundary::force_flow`], whether immersed boundary physics is on
//! or off. The implementation behind the contract is chosen once, when the
//! dispatcher is built, and never re-examined per call.
//!
//! # Module Organization
//!
//! - **`config`**: `IbConfiguration` and `IbFields` (validated at construction)
//! - **`kernels`**: `ImmersedBoundaryKernels` trait and the no-op `StubKernels`
//! - **`levelset`**: `LevelsetKernels`, the level-set based implementation
//! - **`dispatcher`**: `ImmersedBoundary`, the strategy holder
//!
//! # Data flow within one step
//!
//! ```text
//! map_to_grid(grid_x, grid_y, particles)          indicator field ← φ(bodies)
//!        │
//! flow solver predicts velocity (external)
//!        │
//! force_flow(grid_x, grid_y, scalars, particles)  velocity field ← forced velocity
//!        │
//! Poisson solve for pressure (crate::poisson)
//! ```
//!
//! # Example
//!
//! ```rust
//! use flowcore::grid::{GridLocation, StructuredGrid};
//! use flowcore::imbound::{IbConfiguration, ImmersedBoundary};
//! use flowcore::particles::{Circle, Particles};
//! use flowcore::Scalars;
//!
//! let mut grid_x = StructuredGrid::new(GridLocation::XFace, (16, 16), (0.0, 1.0), (0.0, 1.0))?;
//! let mut grid_y = StructuredGrid::new(GridLocation::YFace, (16, 16), (0.0, 1.0), (0.0, 1.0))?;
//! for grid in [&mut grid_x, &mut grid_y] {
//!     grid.add_field("ibmf").add_field("velc");
//! }
//!
//! let particles: Particles = [Circle::new([0.5, 0.5], 0.2)].into_iter().collect();
//! let scalars = Scalars::new(1e-3, 100.0)?;
//!
//! let imbound = ImmersedBoundary::new(IbConfiguration::levelset("ibmf", "velc")?);
//! imbound.map_to_grid(&mut grid_x, &mut grid_y, &particles)?;
//! imbound.force_flow(&mut grid_x, &mut grid_y, &scalars, &particles)?;
//! # Ok::<(), flowcore::FlowError>(())
//! ```

mod config;
mod dispatcher;
mod kernels;
mod levelset;

pub use config::{IbConfiguration, IbFields, STUB_FIELD};
pub use dispatcher::ImmersedBoundary;
pub use kernels::{ImmersedBoundaryKernels, StubKernels};
pub use levelset::{smoothed_heaviside, LevelsetKernels};
