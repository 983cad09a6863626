//! Circular rigid body

use crate::particles::ImmersedBody;

/// Rigid circle translating with constant velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: [f64; 2],
    pub radius: f64,
    pub velocity: [f64; 2],
}

impl Circle {
    /// Stationary circle
    pub fn new(center: [f64; 2], radius: f64) -> Self {
        Self { center, radius, velocity: [0.0, 0.0] }
    }

    /// Same circle with a translational velocity
    pub fn with_velocity(mut self, velocity: [f64; 2]) -> Self {
        self.velocity = velocity;
        self
    }
}

impl ImmersedBody for Circle {
    fn signed_distance(&self, x: f64, y: f64) -> f64 {
        (x - self.center[0]).hypot(y - self.center[1]) - self.radius
    }

    fn velocity(&self) -> [f64; 2] {
        self.velocity
    }
}
