//! Simulation-level options
//!
//! Raw options as a driver collects them, converted into the validated
//! per-component configurations.

use crate::error::FlowResult;
use crate::imbound::{IbConfiguration, ImmersedBoundary};
use crate::poisson::{BoundaryClosure, DirectPoissonSolver, PoissonConfiguration};

/// Options shared by the components of one simulation
///
/// # Examples
///
/// ```rust
/// use flowcore::SimulationOptions;
///
/// let options = SimulationOptions {
///     with_ib: true,
///     ib_vars: Some(("ibmf".to_string(), "velc".to_string())),
///     ..SimulationOptions::default()
/// };
///
/// let imbound = options.immersed_boundary()?;
/// assert!(imbound.is_enabled());
/// # Ok::<(), flowcore::FlowError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationOptions {
    /// Enable immersed boundary physics
    pub with_ib: bool,

    /// Immersed boundary field names, `(indicator, velocity)`
    pub ib_vars: Option<(String, String)>,

    /// Report solver residuals
    pub verbose: bool,

    /// Poisson boundary closure
    pub closure: BoundaryClosure,
}

impl SimulationOptions {
    /// Validated immersed boundary configuration
    pub fn ib_configuration(&self) -> FlowResult<IbConfiguration> {
        let vars = self
            .ib_vars
            .as_ref()
            .map(|(indicator, velocity)| (indicator.as_str(), velocity.as_str()));
        IbConfiguration::new(vars, self.with_ib)
    }

    /// Poisson solve configuration
    pub fn poisson_configuration(&self) -> PoissonConfiguration {
        PoissonConfiguration::new(self.verbose, self.closure)
    }

    /// Immersed boundary dispatcher with its strategy bound
    pub fn immersed_boundary(&self) -> FlowResult<ImmersedBoundary> {
        Ok(ImmersedBoundary::new(self.ib_configuration()?))
    }

    /// Direct Poisson solver
    pub fn poisson_solver(&self) -> DirectPoissonSolver {
        DirectPoissonSolver::with_config(self.poisson_configuration())
    }
}
