//! Poisson solver contract and configuration

use crate::error::FlowResult;
use crate::grid::Grid;
use crate::poisson::operator::BoundaryClosure;

// =================================================================================================
// Configuration
// =================================================================================================

/// Configuration of a Poisson solve
///
/// # Examples
///
/// ```rust
/// use flowcore::poisson::{BoundaryClosure, PoissonConfiguration};
///
/// // Silent, implicit closure
/// let config = PoissonConfiguration::default();
///
/// // Residual reported through `log::info!`
/// let config = PoissonConfiguration::verbose();
///
/// // Explicit zero-Dirichlet closure
/// let config = PoissonConfiguration::default().with_closure(BoundaryClosure::ZeroDirichlet);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoissonConfiguration {
    /// Report the residual after every solve
    pub verbose: bool,

    /// Treatment of neighbours outside the interior
    pub closure: BoundaryClosure,
}

impl PoissonConfiguration {
    /// Create a configuration
    pub fn new(verbose: bool, closure: BoundaryClosure) -> Self {
        Self { verbose, closure }
    }

    /// Implicit closure with residual reporting
    pub fn verbose() -> Self {
        Self::new(true, BoundaryClosure::Implicit)
    }

    /// Replace the boundary closure
    pub fn with_closure(mut self, closure: BoundaryClosure) -> Self {
        self.closure = closure;
        self
    }
}

// =================================================================================================
// Result
// =================================================================================================

/// Outcome of a successful solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Euclidean norm of `A·x − b`, diagnostic only
    pub residual: f64,

    /// Number of unknowns (`nx · ny`)
    pub unknowns: usize,

    /// Stored entries of the assembled operator
    pub nnz: usize,
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Solves the discrete Poisson equation on a grid's interior
///
/// # Contract
///
/// - Reads the right-hand side from field `rvar`, interior only.
/// - Writes the solution into the interior of field `ivar`, then refreshes
///   its guard cells.
/// - The residual is computed after the solve and never triggers a retry.
pub trait PoissonSolver {
    /// Solve for `ivar` given the right-hand side `rvar`
    fn solve(&self, grid: &mut dyn Grid, ivar: &str, rvar: &str) -> FlowResult<SolveReport>;

    /// Solver name
    fn name(&self) -> &'static str;
}
