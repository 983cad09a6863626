//! Error types shared by the Poisson and immersed boundary modules.

use thiserror::Error;

/// Result alias used throughout the crate
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors raised by the numerical core
///
/// Nothing here is retried internally: every variant propagates to the
/// caller, who decides whether to abort or fall back.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlowError {
    /// Invalid or incomplete configuration, raised at construction time
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The assembled operator has no solution for the given right-hand side
    #[error("linear system of size {size} is singular (zero pivot at row {pivot})")]
    LinearSystemSingular { size: usize, pivot: usize },

    /// A named field was requested but never registered on the grid
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Grid dimensions or spacing are not usable
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Non-physical scalar parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
