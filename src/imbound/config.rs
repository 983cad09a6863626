//! Immersed boundary configuration

use crate::error::{FlowError, FlowResult};

/// Placeholder field name carried when no names are supplied
///
/// Never dereferenced: only the stub kernels see it.
pub const STUB_FIELD: &str = "stub";

/// Names of the grid fields the immersed boundary kernels work on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IbFields {
    /// Indicator (level set) field
    pub indicator: String,

    /// Velocity field, one component per face grid
    pub velocity: String,
}

impl IbFields {
    /// Field names for the indicator and the velocity
    pub fn new(indicator: &str, velocity: &str) -> Self {
        Self {
            indicator: indicator.to_string(),
            velocity: velocity.to_string(),
        }
    }

    /// Placeholder names
    pub fn stub() -> Self {
        Self::new(STUB_FIELD, STUB_FIELD)
    }
}

/// Immutable immersed boundary configuration
///
/// # Examples
///
/// ```rust
/// use flowcore::imbound::IbConfiguration;
///
/// // No immersed boundary, placeholder field names
/// let config = IbConfiguration::disabled();
/// assert!(!config.with_ib());
///
/// // Level-set immersed boundary
/// let config = IbConfiguration::levelset("ibmf", "velc")?;
/// assert_eq!(config.fields().indicator, "ibmf");
///
/// // Enabled without names is rejected
/// assert!(IbConfiguration::new(None, true).is_err());
/// # Ok::<(), flowcore::FlowError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbConfiguration {
    with_ib: bool,
    fields: IbFields,
}

impl IbConfiguration {
    /// Create and validate a configuration
    ///
    /// `vars` is `(indicator, velocity)`. Names default to [`STUB_FIELD`]
    /// when absent.
    ///
    /// # Errors
    ///
    /// `Configuration` when `with_ib` is set and `vars` is `None`, or when a
    /// supplied name is empty while `with_ib` is set.
    pub fn new(vars: Option<(&str, &str)>, with_ib: bool) -> FlowResult<Self> {
        let fields = match vars {
            Some((indicator, velocity)) => IbFields::new(indicator, velocity),
            None if with_ib => {
                return Err(FlowError::Configuration(
                    "field names required when immersed boundary is enabled".to_string(),
                ));
            }
            None => IbFields::stub(),
        };

        let config = Self { with_ib, fields };
        config.validate()?;
        Ok(config)
    }

    /// Immersed boundary off
    pub fn disabled() -> Self {
        Self { with_ib: false, fields: IbFields::stub() }
    }

    /// Immersed boundary on, with the given field names
    ///
    /// # Errors
    ///
    /// `Configuration` when a name is empty.
    pub fn levelset(indicator: &str, velocity: &str) -> FlowResult<Self> {
        Self::new(Some((indicator, velocity)), true)
    }

    /// Whether immersed boundary physics is active
    pub fn with_ib(&self) -> bool {
        self.with_ib
    }

    /// Bound field names
    pub fn fields(&self) -> &IbFields {
        &self.fields
    }

    /// Validate field names
    pub fn validate(&self) -> FlowResult<()> {
        if self.with_ib && (self.fields.indicator.is_empty() || self.fields.velocity.is_empty()) {
            return Err(FlowError::Configuration(
                "immersed boundary field names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for IbConfiguration {
    fn default() -> Self {
        Self::disabled()
    }
}
