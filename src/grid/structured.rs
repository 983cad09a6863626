//! Uniform structured grid storing named fields in `ndarray` arrays

use std::collections::HashMap;
use std::fmt;

use ndarray::{s, Array2, ArrayView2};

use crate::error::{FlowError, FlowResult};
use crate::grid::traits::{Grid, GridLocation};

// =================================================================================================
// Guard conditions
// =================================================================================================

/// How the guard layer of a field is refreshed from its interior
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GuardCondition {
    /// Zero gradient: ghost value copies the adjacent interior value
    #[default]
    Neumann,

    /// Fixed boundary value midway between ghost and interior:
    /// `ghost = 2 * value - interior`
    Dirichlet(f64),
}

impl GuardCondition {
    #[inline]
    fn ghost(&self, interior: f64) -> f64 {
        match self {
            GuardCondition::Neumann => interior,
            GuardCondition::Dirichlet(value) => 2.0 * value - interior,
        }
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    data: Array2<f64>,
    condition: GuardCondition,
}

// =================================================================================================
// Structured grid
// =================================================================================================

/// Uniform grid over `[xmin, xmax] × [ymin, ymax]`
///
/// Spacing is derived from the extent: `dx = (xmax - xmin) / nx` and
/// `dy = (ymax - ymin) / ny`. Fields are registered by name and live as
/// `(nx + 2) × (ny + 2)` arrays, initialised to zero.
#[derive(Clone)]
pub struct StructuredGrid {
    location: GridLocation,
    nx: usize,
    ny: usize,
    origin: [f64; 2],
    spacing: [f64; 2],
    fields: HashMap<String, FieldEntry>,
}

impl StructuredGrid {
    /// Create a grid without fields
    ///
    /// # Errors
    ///
    /// `InvalidGrid` when a size is zero or an extent is empty or not finite.
    pub fn new(
        location: GridLocation,
        (nx, ny): (usize, usize),
        (xmin, xmax): (f64, f64),
        (ymin, ymax): (f64, f64),
    ) -> FlowResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(FlowError::InvalidGrid(format!(
                "interior size must be at least 1x1, got {}x{}", nx, ny
            )));
        }

        let dx = (xmax - xmin) / nx as f64;
        let dy = (ymax - ymin) / ny as f64;
        if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
            return Err(FlowError::InvalidGrid(format!(
                "extent [{}, {}] x [{}, {}] gives non-positive spacing", xmin, xmax, ymin, ymax
            )));
        }

        Ok(Self {
            location,
            nx,
            ny,
            origin: [xmin, ymin],
            spacing: [dx, dy],
            fields: HashMap::new(),
        })
    }

    /// Register a zero-initialised field with a Neumann guard condition
    ///
    /// Registering an existing name resets it.
    pub fn add_field(&mut self, name: &str) -> &mut Self {
        self.add_field_with(name, GuardCondition::default())
    }

    /// Register a zero-initialised field with an explicit guard condition
    pub fn add_field_with(&mut self, name: &str, condition: GuardCondition) -> &mut Self {
        let data = Array2::zeros((self.nx + 2, self.ny + 2));
        self.fields.insert(name.to_string(), FieldEntry { data, condition });
        self
    }

    /// Location of the stored values
    pub fn location(&self) -> GridLocation {
        self.location
    }

    /// Check whether a field is registered
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Registered field names, sorted
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// View of the interior region `[1, nx] × [1, ny]` of a field
    pub fn interior(&self, name: &str) -> FlowResult<ArrayView2<'_, f64>> {
        let (nx, ny) = (self.nx, self.ny);
        Ok(self.values(name)?.slice(s![1..=nx, 1..=ny]))
    }

    /// Set interior values from a function of the physical coordinates
    ///
    /// Guard cells are left untouched; call [`Grid::fill_guard_cells`] after.
    pub fn set_interior<F>(&mut self, name: &str, f: F) -> FlowResult<()>
    where
        F: Fn(f64, f64) -> f64,
    {
        let (nx, ny) = (self.nx, self.ny);
        let [x0, y0] = self.origin;
        let [dx, dy] = self.spacing;
        let [ox, oy] = self.location.offsets();

        let field = self.values_mut(name)?;
        for i in 1..=nx {
            for j in 1..=ny {
                let x = x0 + (i as f64 + ox) * dx;
                let y = y0 + (j as f64 + oy) * dy;
                field[[i, j]] = f(x, y);
            }
        }
        Ok(())
    }

    fn entry(&self, name: &str) -> FlowResult<&FieldEntry> {
        self.fields
            .get(name)
            .ok_or_else(|| FlowError::UnknownField(name.to_string()))
    }
}

impl Grid for StructuredGrid {
    fn nx(&self) -> usize {
        self.nx
    }

    fn ny(&self) -> usize {
        self.ny
    }

    fn dx(&self) -> f64 {
        self.spacing[0]
    }

    fn dy(&self) -> f64 {
        self.spacing[1]
    }

    fn point(&self, i: usize, j: usize) -> [f64; 2] {
        let [ox, oy] = self.location.offsets();
        [
            self.origin[0] + (i as f64 + ox) * self.spacing[0],
            self.origin[1] + (j as f64 + oy) * self.spacing[1],
        ]
    }

    fn values(&self, name: &str) -> FlowResult<&Array2<f64>> {
        Ok(&self.entry(name)?.data)
    }

    fn values_mut(&mut self, name: &str) -> FlowResult<&mut Array2<f64>> {
        self.fields
            .get_mut(name)
            .map(|entry| &mut entry.data)
            .ok_or_else(|| FlowError::UnknownField(name.to_string()))
    }

    fn fill_guard_cells(&mut self, name: &str) -> FlowResult<()> {
        let (nx, ny) = (self.nx, self.ny);
        let entry = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FlowError::UnknownField(name.to_string()))?;
        let condition = entry.condition;
        let data = &mut entry.data;

        // West and east sides first, then south and north over the full
        // width so the corners pick up the freshly filled side values.
        for j in 1..=ny {
            data[[0, j]] = condition.ghost(data[[1, j]]);
            data[[nx + 1, j]] = condition.ghost(data[[nx, j]]);
        }
        for i in 0..nx + 2 {
            data[[i, 0]] = condition.ghost(data[[i, 1]]);
            data[[i, ny + 1]] = condition.ghost(data[[i, ny]]);
        }

        Ok(())
    }
}

impl fmt::Debug for StructuredGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredGrid")
            .field("location", &self.location)
            .field("nx", &self.nx)
            .field("ny", &self.ny)
            .field("dx", &self.spacing[0])
            .field("dy", &self.spacing[1])
            .field("fields", &self.field_names())
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
