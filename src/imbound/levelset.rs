//! Level-set immersed boundary kernels
//!
//! `compute` stores a signed level set φ in the indicator field, positive
//! inside a body and negative outside. `force` blends the fluid velocity
//! toward the body velocity with a smoothed Heaviside weight of φ, so cells
//! well inside a body take the body velocity and cells well outside are left
//! untouched.

use std::f64::consts::PI;

use ndarray::Array2;

use crate::error::FlowResult;
use crate::grid::Grid;
use crate::particles::Particles;
use crate::scalars::Scalars;

use super::config::IbFields;
use super::kernels::ImmersedBoundaryKernels;

/// Default smoothing half-width, in grid spacings
pub const DEFAULT_SMOOTHING: f64 = 1.5;

/// Smoothed Heaviside function
///
/// 0 for `phi <= -eps`, 1 for `phi >= eps`, and a smooth monotone ramp in
/// between with value 0.5 at `phi = 0`. Always within `[0, 1]`.
///
/// # Examples
///
/// ```rust
/// use flowcore::imbound::smoothed_heaviside;
///
/// assert_eq!(smoothed_heaviside(-1.0, 0.1), 0.0);
/// assert_eq!(smoothed_heaviside(1.0, 0.1), 1.0);
/// assert!((smoothed_heaviside(0.0, 0.1) - 0.5).abs() < 1e-15);
/// ```
pub fn smoothed_heaviside(phi: f64, eps: f64) -> f64 {
    if phi <= -eps {
        0.0
    } else if phi >= eps {
        1.0
    } else {
        (0.5 * (1.0 + phi / eps + (PI * phi / eps).sin() / PI)).clamp(0.0, 1.0)
    }
}

/// Level set at a point: negated distance to the nearest body surface
///
/// Infinitely negative when there are no bodies.
fn levelset_at(particles: &Particles, x: f64, y: f64) -> f64 {
    particles
        .nearest(x, y)
        .map_or(f64::NEG_INFINITY, |(_, distance)| -distance)
}

/// Level-set kernels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelsetKernels {
    smoothing: f64,
}

impl LevelsetKernels {
    /// Kernels with the default smoothing width
    pub fn new() -> Self {
        Self { smoothing: DEFAULT_SMOOTHING }
    }

    /// Kernels with a custom smoothing width, in grid spacings
    ///
    /// # Panics
    ///
    /// Panics unless `smoothing` is positive and finite.
    pub fn with_smoothing(smoothing: f64) -> Self {
        assert!(
            smoothing.is_finite() && smoothing > 0.0,
            "smoothing width must be positive and finite"
        );
        Self { smoothing }
    }

    /// Smoothing width in grid spacings
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Evaluate φ at every storage point of one grid, guard cells included
    fn map_grid(&self, grid: &mut dyn Grid, particles: &Particles, indicator: &str) -> FlowResult<()> {
        let shape = (grid.nx() + 2, grid.ny() + 2);
        let phi = Array2::from_shape_fn(shape, |(i, j)| {
            let [x, y] = grid.point(i, j);
            levelset_at(particles, x, y)
        });

        grid.values_mut(indicator)?.assign(&phi);
        Ok(())
    }

    /// Force one velocity component on one grid
    fn force_grid(
        &self,
        grid: &mut dyn Grid,
        particles: &Particles,
        fields: &IbFields,
        component: usize,
    ) -> FlowResult<()> {
        let (nx, ny) = (grid.nx(), grid.ny());
        let eps = self.smoothing * grid.dx().max(grid.dy());

        let mut updates = Vec::new();
        {
            let phi = grid.values(&fields.indicator)?;
            for i in 1..=nx {
                for j in 1..=ny {
                    let weight = smoothed_heaviside(phi[[i, j]], eps);
                    if weight == 0.0 {
                        continue;
                    }
                    let [x, y] = grid.point(i, j);
                    if let Some((body, _)) = particles.nearest(x, y) {
                        updates.push((i, j, weight, body.velocity()[component]));
                    }
                }
            }
        }

        let velocity = grid.values_mut(&fields.velocity)?;
        for (i, j, weight, target) in updates {
            let u = velocity[[i, j]];
            velocity[[i, j]] = u + weight * (target - u);
        }

        grid.fill_guard_cells(&fields.velocity)
    }
}

impl Default for LevelsetKernels {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmersedBoundaryKernels for LevelsetKernels {
    fn compute(
        &self,
        grid_x: &mut dyn Grid,
        grid_y: &mut dyn Grid,
        particles: &Particles,
        fields: &IbFields,
    ) -> FlowResult<()> {
        self.map_grid(grid_x, particles, &fields.indicator)?;
        self.map_grid(grid_y, particles, &fields.indicator)
    }

    /// Direct forcing: independent of the time step and Reynolds number
    fn force(
        &self,
        grid_x: &mut dyn Grid,
        grid_y: &mut dyn Grid,
        _scalars: &Scalars,
        particles: &Particles,
        fields: &IbFields,
    ) -> FlowResult<()> {
        self.force_grid(grid_x, particles, fields, 0)?;
        self.force_grid(grid_y, particles, fields, 1)
    }

    fn name(&self) -> &'static str {
        "levelset"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::grid::{GridLocation, StructuredGrid};
    use crate::particles::Circle;
    use approx::assert_relative_eq;

    fn face_grids(n: usize) -> (StructuredGrid, StructuredGrid) {
        let mut grid_x =
            StructuredGrid::new(GridLocation::XFace, (n, n), (0.0, 1.0), (0.0, 1.0)).unwrap();
        let mut grid_y =
            StructuredGrid::new(GridLocation::YFace, (n, n), (0.0, 1.0), (0.0, 1.0)).unwrap();
        for grid in [&mut grid_x, &mut grid_y] {
            grid.add_field("ibmf").add_field("velc");
        }
        (grid_x, grid_y)
    }

    #[test]
    fn test_heaviside_is_monotone() {
        let eps = 0.2;
        let mut previous = 0.0;
        for k in -30..=30 {
            let value = smoothed_heaviside(k as f64 * 0.01, eps);
            assert!(value >= previous);
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
        assert_relative_eq!(smoothed_heaviside(eps, eps), 1.0, epsilon = 1e-15);
        assert_relative_eq!(smoothed_heaviside(-eps, eps), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_heaviside_band_edges_are_exact() {
        for eps in [0.2, 0.075, 1.0 / 3.0] {
            assert_eq!(smoothed_heaviside(-eps, eps), 0.0);
            assert_eq!(smoothed_heaviside(eps, eps), 1.0);
            // Just inside the band the ramp never leaves [0, 1]
            let inside = -eps * (1.0 - 1e-12);
            assert!((0.0..=1.0).contains(&smoothed_heaviside(inside, eps)));
        }
    }

    #[test]
    fn test_compute_sign_convention() {
        let (mut grid_x, mut grid_y) = face_grids(20);
        let particles: Particles = [Circle::new([0.5, 0.5], 0.25)].into_iter().collect();
        let fields = IbFields::new("ibmf", "velc");

        LevelsetKernels::new()
            .compute(&mut grid_x, &mut grid_y, &particles, &fields)
            .unwrap();

        for grid in [&grid_x, &grid_y] {
            let phi = grid.values("ibmf").unwrap();
            for i in 0..22 {
                for j in 0..22 {
                    let [x, y] = grid.point(i, j);
                    let expected = 0.25 - ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt();
                    assert_relative_eq!(phi[[i, j]], expected, epsilon = 1e-14);
                }
            }
        }
    }

    #[test]
    fn test_force_blends_toward_body_velocity() {
        let (mut grid_x, mut grid_y) = face_grids(20);
        let particles: Particles = [Circle::new([0.5, 0.5], 0.25).with_velocity([1.0, -2.0])]
            .into_iter()
            .collect();
        let fields = IbFields::new("ibmf", "velc");
        let scalars = Scalars::new(0.01, 100.0).unwrap();
        let kernels = LevelsetKernels::new();

        kernels.compute(&mut grid_x, &mut grid_y, &particles, &fields).unwrap();
        kernels
            .force(&mut grid_x, &mut grid_y, &scalars, &particles, &fields)
            .unwrap();

        // Face (10, 10) of grid_x sits at (0.5, 0.475), deep inside the body
        assert_relative_eq!(grid_x.values("velc").unwrap()[[10, 10]], 1.0, epsilon = 1e-14);
        assert_relative_eq!(grid_y.values("velc").unwrap()[[10, 10]], -2.0, epsilon = 1e-14);

        // Far corners are outside the smoothing band
        assert_eq!(grid_x.values("velc").unwrap()[[1, 1]], 0.0);
        assert_eq!(grid_y.values("velc").unwrap()[[20, 20]], 0.0);

        // Starting from rest, u equals the weight times the body velocity
        let eps = 1.5 * 0.05;
        let phi = grid_x.values("ibmf").unwrap();
        let velc = grid_x.values("velc").unwrap();
        for i in 1..=20 {
            for j in 1..=20 {
                let expected = smoothed_heaviside(phi[[i, j]], eps);
                assert_relative_eq!(velc[[i, j]], expected, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_force_without_bodies_is_identity() {
        let (mut grid_x, mut grid_y) = face_grids(8);
        grid_x.set_interior("velc", |x, y| x + y).unwrap();
        grid_x.fill_guard_cells("velc").unwrap();
        let before = grid_x.values("velc").unwrap().clone();

        let particles = Particles::new();
        let fields = IbFields::new("ibmf", "velc");
        let scalars = Scalars::new(0.01, 100.0).unwrap();
        let kernels = LevelsetKernels::new();

        kernels.compute(&mut grid_x, &mut grid_y, &particles, &fields).unwrap();
        kernels
            .force(&mut grid_x, &mut grid_y, &scalars, &particles, &fields)
            .unwrap();

        assert_eq!(grid_x.values("velc").unwrap(), &before);
        assert!(grid_x.values("ibmf").unwrap().iter().all(|v| *v == f64::NEG_INFINITY));
    }

    #[test]
    fn test_missing_field_reported() {
        let mut grid_x =
            StructuredGrid::new(GridLocation::XFace, (4, 4), (0.0, 1.0), (0.0, 1.0)).unwrap();
        let mut grid_y =
            StructuredGrid::new(GridLocation::YFace, (4, 4), (0.0, 1.0), (0.0, 1.0)).unwrap();
        let particles: Particles = [Circle::new([0.5, 0.5], 0.1)].into_iter().collect();
        let fields = IbFields::new("ibmf", "velc");

        let err = LevelsetKernels::new()
            .compute(&mut grid_x, &mut grid_y, &particles, &fields)
            .unwrap_err();
        assert_eq!(err, FlowError::UnknownField("ibmf".to_string()));
    }

    #[test]
    #[should_panic(expected = "smoothing width")]
    fn test_invalid_smoothing() {
        LevelsetKernels::with_smoothing(0.0);
    }
}
