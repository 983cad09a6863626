//! Immersed boundary dispatcher

use crate::error::FlowResult;
use crate::grid::Grid;
use crate::particles::Particles;
use crate::scalars::Scalars;

use super::config::{IbConfiguration, IbFields};
use super::kernels::{ImmersedBoundaryKernels, StubKernels};
use super::levelset::LevelsetKernels;

/// Immersed boundary component with a strategy fixed at construction
///
/// When the configuration has `with_ib` unset, the stub kernels are bound
/// and both operations return immediately, leaving every field untouched.
/// Otherwise the supplied (or default level-set) kernels are bound. The
/// choice is never revisited.
///
/// # Examples
///
/// ```rust
/// use flowcore::imbound::{IbConfiguration, ImmersedBoundary};
///
/// let off = ImmersedBoundary::new(IbConfiguration::disabled());
/// assert!(!off.is_enabled());
/// assert_eq!(off.strategy_name(), "stub");
///
/// let on = ImmersedBoundary::from_vars(Some(("ibmf", "velc")), true)?;
/// assert_eq!(on.strategy_name(), "levelset");
/// # Ok::<(), flowcore::FlowError>(())
/// ```
#[derive(Debug)]
pub struct ImmersedBoundary {
    config: IbConfiguration,
    kernels: Box<dyn ImmersedBoundaryKernels>,
}

impl ImmersedBoundary {
    /// Bind the default level-set kernels, or the stub when disabled
    pub fn new(config: IbConfiguration) -> Self {
        Self::with_kernels(config, Box::new(LevelsetKernels::default()))
    }

    /// Validate raw options and bind kernels
    ///
    /// # Errors
    ///
    /// `Configuration` when `with_ib` is set and `vars` is `None`.
    pub fn from_vars(vars: Option<(&str, &str)>, with_ib: bool) -> FlowResult<Self> {
        Ok(Self::new(IbConfiguration::new(vars, with_ib)?))
    }

    /// Bind explicit kernels
    ///
    /// `kernels` is dropped in favour of [`StubKernels`] when the
    /// configuration has immersed boundary physics off.
    pub fn with_kernels(config: IbConfiguration, kernels: Box<dyn ImmersedBoundaryKernels>) -> Self {
        let kernels: Box<dyn ImmersedBoundaryKernels> = if config.with_ib() {
            kernels
        } else {
            Box::new(StubKernels)
        };

        log::debug!(
            "immersed boundary bound to '{}' kernels (indicator '{}', velocity '{}')",
            kernels.name(),
            config.fields().indicator,
            config.fields().velocity
        );

        Self { config, kernels }
    }

    /// Map particle geometry onto both face grids
    ///
    /// No effect when immersed boundary physics is off.
    pub fn map_to_grid(
        &self,
        grid_x: &mut dyn Grid,
        grid_y: &mut dyn Grid,
        particles: &Particles,
    ) -> FlowResult<()> {
        self.kernels
            .compute(grid_x, grid_y, particles, self.config.fields())
    }

    /// Apply immersed boundary forcing to the velocity on both face grids
    ///
    /// No effect when immersed boundary physics is off.
    pub fn force_flow(
        &self,
        grid_x: &mut dyn Grid,
        grid_y: &mut dyn Grid,
        scalars: &Scalars,
        particles: &Particles,
    ) -> FlowResult<()> {
        self.kernels
            .force(grid_x, grid_y, scalars, particles, self.config.fields())
    }

    /// Whether immersed boundary physics is active
    pub fn is_enabled(&self) -> bool {
        self.config.with_ib()
    }

    /// Bound field names
    pub fn fields(&self) -> &IbFields {
        self.config.fields()
    }

    /// Configuration the dispatcher was built from
    pub fn config(&self) -> &IbConfiguration {
        &self.config
    }

    /// Name of the bound kernels
    pub fn strategy_name(&self) -> &'static str {
        self.kernels.name()
    }
}

impl Default for ImmersedBoundary {
    fn default() -> Self {
        Self::new(IbConfiguration::disabled())
    }
}
