//! Run configuration.
//!
//! A [`Config`] is the immutable, non-dimensional description of one
//! simulation. It is either loaded directly from YAML or derived from a
//! [`DimensionalParams`] set, which also supplies the [`Scales`] needed by
//! forcing data recorded in physical units.
//!
//! ```yaml
//! name: growth
//! model: EQM
//! total_time: 4.0
//! savefreq: 0.01
//! forcing_config:
//!   type: yearly
//!   amplitude: 0.75
//! numerical_params:
//!   I: 40
//!   solver: implicit
//! ```

mod bubble;
mod convection;
mod dimensional;
mod forcing;
mod initial;
mod numerical;
mod physical;

pub use bubble::{
    BubbleDistribution, BubbleParams, MonoBubbleParams, PowerLawBubbleParams, WallDragLaw,
};
pub use convection::{BrineConvectionParams, Rjw14Params};
pub use dimensional::{
    DimensionalBrineConvection, DimensionalBubbleDistribution, DimensionalForcing,
    DimensionalInitialConditions, DimensionalOceanForcing, DimensionalParams,
    DimensionalRjw14Params, Scales, timescale_in_days, velocity_scale_in_m_per_day,
};
pub use forcing::{
    BoundaryConfig, ConstantForcing, FIELD_STATION_OCEAN_COLUMN, FIELD_STATION_TIME_COLUMN,
    FieldStationForcing, FieldStationRecord, ForcingConfig, OceanForcingConfig,
    RadiativeForcing, ReanalysisForcing, YearlyForcing,
};
pub use initial::{
    FieldStationInitialConditions, InitialConditionsConfig, SummerInitialConditions,
};
pub use numerical::{AdaptiveScheme, NumericalParams, SolverChoice};
pub use physical::PhysicalParams;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors detected while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("{0} requires conversion scales; build the configuration from dimensional parameters")]
    MissingScales(&'static str),

    #[error("Incompatible options: {0}")]
    Incompatible(String),
}

/// Gas phase model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelChoice {
    /// Dissolved gas and bubbles in equilibrium.
    #[default]
    #[serde(rename = "EQM")]
    Eqm,
    /// Bubbles nucleate at a finite rate.
    #[serde(rename = "DISEQ")]
    Diseq,
}

/// Enthalpy method used by the EQM model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnthalpyMethodChoice {
    /// Gas decoupled from the energy balance.
    #[default]
    Reduced,
    /// Gas fraction included in the phase boundaries.
    Full,
}

/// Non-dimensional simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub name: String,
    pub model: ModelChoice,
    pub enthalpy_method: EnthalpyMethodChoice,
    /// default: 4.0
    pub total_time: f64,
    /// default: 5e-4
    pub savefreq: f64,
    pub physical_params: PhysicalParams,
    pub bubble_params: BubbleParams,
    pub brine_convection: BrineConvectionParams,
    pub forcing_config: ForcingConfig,
    pub boundary_config: BoundaryConfig,
    pub initial_conditions_config: InitialConditionsConfig,
    pub numerical_params: NumericalParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            model: ModelChoice::Eqm,
            enthalpy_method: EnthalpyMethodChoice::Reduced,
            total_time: 4.0,
            savefreq: 5e-4,
            physical_params: PhysicalParams::default(),
            bubble_params: BubbleParams::default(),
            brine_convection: BrineConvectionParams::None,
            forcing_config: ForcingConfig::default(),
            boundary_config: BoundaryConfig::default(),
            initial_conditions_config: InitialConditionsConfig::Uniform,
            numerical_params: NumericalParams::default(),
            scales: None,
        }
    }
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: ModelChoice) -> Self {
        self.model = model;
        self
    }

    pub fn with_enthalpy_method(mut self, method: EnthalpyMethodChoice) -> Self {
        self.enthalpy_method = method;
        self
    }

    pub fn with_times(mut self, total_time: f64, savefreq: f64) -> Self {
        self.total_time = total_time;
        self.savefreq = savefreq;
        self
    }

    pub fn with_physical_params(mut self, params: PhysicalParams) -> Self {
        self.physical_params = params;
        self
    }

    pub fn with_bubble_params(mut self, params: BubbleParams) -> Self {
        self.bubble_params = params;
        self
    }

    pub fn with_brine_convection(mut self, params: BrineConvectionParams) -> Self {
        self.brine_convection = params;
        self
    }

    pub fn with_forcing(mut self, forcing: ForcingConfig) -> Self {
        self.forcing_config = forcing;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryConfig) -> Self {
        self.boundary_config = boundary;
        self
    }

    pub fn with_initial_conditions(mut self, initial: InitialConditionsConfig) -> Self {
        self.initial_conditions_config = initial;
        self
    }

    pub fn with_numerical_params(mut self, params: NumericalParams) -> Self {
        self.numerical_params = params;
        self
    }

    /// Number of save points after the initial state, `floor(total_time / savefreq)`.
    pub fn n_saves(&self) -> usize {
        // Guard against 3.9999999 / 0.1 style round-off
        ((self.total_time / self.savefreq) + 1e-9).floor() as usize
    }

    /// Times at which the state is archived: `k * savefreq` for k = 0..=N.
    pub fn save_times(&self) -> Vec<f64> {
        (0..=self.n_saves())
            .map(|k| k as f64 * self.savefreq)
            .collect()
    }

    /// Check parameters before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numerical = &self.numerical_params;
        if numerical.n_cells == 0 {
            return Err(invalid("I", "need at least one cell"));
        }
        positive("timestep", numerical.timestep)?;
        positive("total_time", self.total_time)?;
        positive("savefreq", self.savefreq)?;
        if self.savefreq > self.total_time {
            return Err(invalid(
                "savefreq",
                format!("{} exceeds total_time {}", self.savefreq, self.total_time),
            ));
        }
        if !(numerical.regularisation >= 0.0) {
            return Err(invalid("regularisation", "must be non-negative"));
        }
        positive("rtol", numerical.rtol)?;
        positive("atol", numerical.atol)?;

        let physical = &self.physical_params;
        positive("stefan_number", physical.stefan_number)?;
        positive("concentration_ratio", physical.concentration_ratio)?;
        let chi = physical.expansion_coefficient;
        if !(chi > 0.0 && chi < 1.0) {
            return Err(invalid("expansion_coefficient", format!("{} not in (0, 1)", chi)));
        }
        positive(
            "tolerable_super_saturation_fraction",
            physical.tolerable_super_saturation_fraction,
        )?;
        if physical.eddy_diffusivity_ratio < 1.0 {
            return Err(invalid("eddy_diffusivity_ratio", "must be at least 1"));
        }

        let bubble = &self.bubble_params;
        if bubble.porosity_threshold
            && !(bubble.porosity_threshold_value > 0.0 && bubble.porosity_threshold_value < 1.0)
        {
            return Err(invalid("porosity_threshold_value", "must lie in (0, 1)"));
        }
        match &bubble.distribution {
            BubbleDistribution::Mono(mono) => {
                positive("bubble_radius_scaled", mono.bubble_radius_scaled)?
            }
            BubbleDistribution::PowerLaw(law) => {
                positive("minimum_bubble_radius_scaled", law.minimum_bubble_radius_scaled)?;
                if law.maximum_bubble_radius_scaled <= law.minimum_bubble_radius_scaled {
                    return Err(invalid(
                        "maximum_bubble_radius_scaled",
                        "must exceed the minimum radius",
                    ));
                }
            }
        }

        if let Some(rjw14) = self.brine_convection.rjw14() {
            positive("rayleigh_salt", rjw14.rayleigh_salt)?;
            if rjw14.convection_strength < 0.0 {
                return Err(invalid("convection_strength", "must be non-negative"));
            }
        }

        if self.model == ModelChoice::Diseq && self.enthalpy_method == EnthalpyMethodChoice::Full {
            return Err(ConfigError::Incompatible(
                "the full enthalpy method is only available for the EQM model".to_string(),
            ));
        }

        if self.scales.is_none() {
            if self.forcing_config.needs_scales() {
                return Err(ConfigError::MissingScales(self.forcing_config.label()));
            }
            if self.boundary_config.ocean.needs_scales() {
                return Err(ConfigError::MissingScales("field station ocean forcing"));
            }
            if self.initial_conditions_config.needs_scales() {
                return Err(ConfigError::MissingScales("ice layer initial conditions"));
            }
        }

        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Write `{name}.yml` into `directory`.
    pub fn save(&self, directory: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        let path = directory.as_ref().join(format!("{}.yml", self.name));
        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }
}

fn invalid(name: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        message: message.into(),
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, format!("{} must be positive and finite", value)))
    }
}
