//! Immersed objects
//!
//! [`Particles`] is the container handed through the immersed boundary
//! dispatcher. The dispatcher and the Poisson solver never look inside it;
//! only level-set kernels query the bodies it holds.
//!
//! # Implementing a new body
//!
//! ```rust
//! use flowcore::particles::{ImmersedBody, Particles};
//!
//! #[derive(Debug)]
//! struct Wall { y: f64 }
//!
//! impl ImmersedBody for Wall {
//!     fn signed_distance(&self, _x: f64, y: f64) -> f64 { self.y - y }
//!     fn velocity(&self) -> [f64; 2] { [0.0, 0.0] }
//! }
//!
//! let mut particles = Particles::new();
//! particles.push(Wall { y: 0.1 });
//! assert_eq!(particles.len(), 1);
//! ```

mod circle;

pub use circle::Circle;

use std::fmt::Debug;

/// Geometry and rigid motion of one immersed object
pub trait ImmersedBody: Debug + Send + Sync {
    /// Signed distance from `(x, y)` to the body surface, negative inside
    fn signed_distance(&self, x: f64, y: f64) -> f64;

    /// Rigid translational velocity `[u, v]`
    fn velocity(&self) -> [f64; 2];
}

/// Collection of immersed bodies
#[derive(Debug, Default)]
pub struct Particles {
    bodies: Vec<Box<dyn ImmersedBody>>,
}

impl Particles {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body
    pub fn push<B: ImmersedBody + 'static>(&mut self, body: B) {
        self.bodies.push(Box::new(body));
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over the bodies
    pub fn iter(&self) -> impl Iterator<Item = &dyn ImmersedBody> {
        self.bodies.iter().map(|body| body.as_ref())
    }

    /// Closest body to `(x, y)` and its signed distance
    ///
    /// Returns `None` when the collection is empty.
    pub fn nearest(&self, x: f64, y: f64) -> Option<(&dyn ImmersedBody, f64)> {
        self.iter()
            .map(|body| (body, body.signed_distance(x, y)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl FromIterator<Circle> for Particles {
    fn from_iter<I: IntoIterator<Item = Circle>>(iter: I) -> Self {
        let mut particles = Particles::new();
        for circle in iter {
            particles.push(circle);
        }
        particles
    }
}
