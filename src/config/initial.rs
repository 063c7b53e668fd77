//! Initial condition settings.

use serde::{Deserialize, Serialize};

/// Ice layer of a field-station run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldStationInitialConditions {
    /// Bulk gas in the initial ice as a fraction of χ.
    /// default: 0.2
    pub initial_bulk_gas_in_ice: f64,
}

impl Default for FieldStationInitialConditions {
    fn default() -> Self {
        Self {
            initial_bulk_gas_in_ice: 0.2,
        }
    }
}

/// Warm ice layer over a slightly supercooled ocean.
///
/// All values are non-dimensional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummerInitialConditions {
    /// default: 0.5
    pub initial_summer_ice_depth: f64,
    /// default: -0.05
    pub initial_summer_ocean_temperature: f64,
    /// default: -0.1
    pub initial_summer_ice_temperature: f64,
}

impl Default for SummerInitialConditions {
    fn default() -> Self {
        Self {
            initial_summer_ice_depth: 0.5,
            initial_summer_ocean_temperature: -0.05,
            initial_summer_ice_temperature: -0.1,
        }
    }
}

/// Choice of initial state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InitialConditionsConfig {
    /// Far-field ocean values in every cell.
    #[default]
    Uniform,
    FieldStation(FieldStationInitialConditions),
    Summer(SummerInitialConditions),
}

impl InitialConditionsConfig {
    /// Field-station and summer ice layers are specified in physical units.
    pub fn needs_scales(&self) -> bool {
        !matches!(self, InitialConditionsConfig::Uniform)
    }
}
