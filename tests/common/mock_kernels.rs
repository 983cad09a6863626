//! Mock immersed boundary kernels for testing
//!
//! Record every call the dispatcher forwards, so tests can check which
//! strategy was bound and what it was handed.

use std::sync::{Arc, Mutex};

use flowcore::grid::Grid;
use flowcore::imbound::{IbFields, ImmersedBoundaryKernels};
use flowcore::particles::Particles;
use flowcore::{FlowResult, Scalars};

/// One forwarded call
#[derive(Debug, Clone, PartialEq)]
pub enum KernelCall {
    Compute { bodies: usize, fields: IbFields },
    Force { dt: f64, bodies: usize, fields: IbFields },
}

/// Kernels that only record calls
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingKernels {
    calls: Arc<Mutex<Vec<KernelCall>>>,
}

impl RecordingKernels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<KernelCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: KernelCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ImmersedBoundaryKernels for RecordingKernels {
    fn compute(
        &self,
        _grid_x: &mut dyn Grid,
        _grid_y: &mut dyn Grid,
        particles: &Particles,
        fields: &IbFields,
    ) -> FlowResult<()> {
        self.record(KernelCall::Compute {
            bodies: particles.len(),
            fields: fields.clone(),
        });
        Ok(())
    }

    fn force(
        &self,
        _grid_x: &mut dyn Grid,
        _grid_y: &mut dyn Grid,
        scalars: &Scalars,
        particles: &Particles,
        fields: &IbFields,
    ) -> FlowResult<()> {
        self.record(KernelCall::Force {
            dt: scalars.dt(),
            bodies: particles.len(),
            fields: fields.clone(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
