//! Time-stepping scalars handed to immersed boundary forcing
//!
//! The core only reads these values. Time-step bookkeeping itself lives
//! with the flow solver.

use crate::error::{FlowError, FlowResult};

/// Time step and Reynolds number of the current step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalars {
    dt: f64,
    reynolds: f64,
}

impl Scalars {
    /// Create scalars
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when either value is not strictly positive and finite.
    pub fn new(dt: f64, reynolds: f64) -> FlowResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(FlowError::InvalidParameter(format!(
                "time step must be positive, got {}", dt
            )));
        }
        if !(reynolds.is_finite() && reynolds > 0.0) {
            return Err(FlowError::InvalidParameter(format!(
                "Reynolds number must be positive, got {}", reynolds
            )));
        }
        Ok(Self { dt, reynolds })
    }

    /// Time step
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Reynolds number
    pub fn reynolds(&self) -> f64 {
        self.reynolds
    }

    /// Kinematic viscosity in non-dimensional units (`1 / Re`)
    pub fn viscosity(&self) -> f64 {
        1.0 / self.reynolds
    }
}
