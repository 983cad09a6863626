//! Kernel contract behind the immersed boundary dispatcher

use std::fmt::Debug;

use crate::error::FlowResult;
use crate::grid::Grid;
use crate::particles::Particles;
use crate::scalars::Scalars;

use super::config::IbFields;

/// Interface for immersed boundary implementations
///
/// # Contract
///
/// - `compute` writes the indicator field `fields.indicator` on both face
///   grids from the current particle geometry.
/// - `force` modifies the velocity field `fields.velocity` on both face
///   grids; `grid_x` carries the x component and `grid_y` the y component.
/// - Neither operation may touch fields other than the two named ones.
///
/// Implementations are selected once by
/// [`ImmersedBoundary`](super::ImmersedBoundary) and called through a trait
/// object, so the trait stays object safe.
pub trait ImmersedBoundaryKernels: Debug + Send + Sync {
    /// Map particle geometry onto the grids
    fn compute(
        &self,
        grid_x: &mut dyn Grid,
        grid_y: &mut dyn Grid,
        particles: &Particles,
        fields: &IbFields,
    ) -> FlowResult<()>;

    /// Apply immersed boundary forcing to the velocity field
    fn force(
        &self,
        grid_x: &mut dyn Grid,
        grid_y: &mut dyn Grid,
        scalars: &Scalars,
        particles: &Particles,
        fields: &IbFields,
    ) -> FlowResult<()>;

    /// Kernel name for logging
    fn name(&self) -> &'static str;
}

/// Kernels that do nothing
///
/// Bound whenever immersed boundary physics is off. Arguments are not
/// inspected, so placeholder field names are never looked up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StubKernels;

impl ImmersedBoundaryKernels for StubKernels {
    fn compute(
        &self,
        _grid_x: &mut dyn Grid,
        _grid_y: &mut dyn Grid,
        _particles: &Particles,
        _fields: &IbFields,
    ) -> FlowResult<()> {
        Ok(())
    }

    fn force(
        &self,
        _grid_x: &mut dyn Grid,
        _grid_y: &mut dyn Grid,
        _scalars: &Scalars,
        _particles: &Particles,
        _fields: &IbFields,
    ) -> FlowResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
