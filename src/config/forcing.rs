//! Surface forcing and ocean boundary settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Constant surface temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantForcing {
    /// Non-dimensional surface temperature.
    /// default: -1.5
    pub constant_top_temperature: f64,
}

impl Default for ConstantForcing {
    fn default() -> Self {
        Self {
            constant_top_temperature: -1.5,
        }
    }
}

/// Sinusoidal surface temperature `A (cos(2π t / P) + offset)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearlyForcing {
    /// default: -1.0
    pub offset: f64,
    /// default: 0.75
    pub amplitude: f64,
    /// Period in non-dimensional time.
    /// default: 4.0
    pub period: f64,
}

impl Default for YearlyForcing {
    fn default() -> Self {
        Self {
            offset: -1.0,
            amplitude: 0.75,
            period: 4.0,
        }
    }
}

/// Surface temperature interpolated from an atmospheric reanalysis record.
///
/// The file holds whitespace separated columns of time in days and air
/// temperature in degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReanalysisForcing {
    pub data_path: PathBuf,
    /// default: 0
    pub time_column: usize,
    /// default: 1
    pub temperature_column: usize,
}

impl Default for ReanalysisForcing {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("forcing_data/reanalysis.txt"),
            time_column: 0,
            temperature_column: 1,
        }
    }
}

/// Thermistor record used for the surface temperature of field-station runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStationRecord {
    #[default]
    Air,
    BottomSnow,
    TopIce,
}

impl FieldStationRecord {
    /// Column of the record in the tab separated field-station file.
    pub fn column(self) -> usize {
        match self {
            FieldStationRecord::Air => FIELD_STATION_AIR_COLUMN,
            FieldStationRecord::BottomSnow => FIELD_STATION_BOTTOM_SNOW_COLUMN,
            FieldStationRecord::TopIce => FIELD_STATION_TOP_ICE_COLUMN,
        }
    }
}

/// Column of time in days in the field-station file.
pub const FIELD_STATION_TIME_COLUMN: usize = 0;
pub const FIELD_STATION_AIR_COLUMN: usize = 8;
pub const FIELD_STATION_BOTTOM_SNOW_COLUMN: usize = 18;
pub const FIELD_STATION_TOP_ICE_COLUMN: usize = 19;
pub const FIELD_STATION_OCEAN_COLUMN: usize = 43;

/// Surface temperature from a field-station thermistor string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldStationForcing {
    pub data_path: PathBuf,
    /// default: air
    pub top_temperature_record: FieldStationRecord,
}

impl Default for FieldStationForcing {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("forcing_data/BRW09.txt"),
            top_temperature_record: FieldStationRecord::Air,
        }
    }
}

/// Radiative forcing: shortwave heating in the ice and an optional surface
/// energy balance setting the top temperature.
///
/// All irradiances are dimensional (W/m²), so a run using this forcing needs
/// conversion scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiativeForcing {
    /// Solve an energy balance for the top temperature instead of prescribing it.
    /// default: true
    pub surface_energy_balance_forcing: bool,

    /// Add absorbed shortwave radiation as a heat source in the ice.
    /// default: false
    pub sw_internal_heating: bool,

    /// Downwelling shortwave irradiance at the surface (W/m²).
    /// default: 280
    pub constant_sw_irradiance: f64,

    /// Downwelling longwave irradiance at the surface (W/m²).
    /// default: 260
    pub constant_lw_irradiance: f64,

    /// Surface albedo for shortwave radiation.
    /// default: 0.7
    pub sw_albedo: f64,

    /// Fraction of the net shortwave that penetrates below the surface layer.
    /// default: 0.4
    pub sw_penetration_fraction: f64,

    /// Deposit all absorption above the cutoff wavelength in the top cell.
    /// default: false
    pub fast_radiative_transfer: bool,

    /// Cutoff wavelength (nm) separating the visible band from the infrared band.
    /// default: 700
    pub cutoff_wavelength: f64,

    /// Surface temperature (non-dimensional) used when the energy balance is off.
    /// default: -1.5
    pub constant_top_temperature: f64,
}

impl Default for RadiativeForcing {
    fn default() -> Self {
        Self {
            surface_energy_balance_forcing: true,
            sw_internal_heating: false,
            constant_sw_irradiance: 280.0,
            constant_lw_irradiance: 260.0,
            sw_albedo: 0.7,
            sw_penetration_fraction: 0.4,
            fast_radiative_transfer: false,
            cutoff_wavelength: 700.0,
            constant_top_temperature: -1.5,
        }
    }
}

/// Surface (top boundary) forcing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForcingConfig {
    Constant(ConstantForcing),
    Yearly(YearlyForcing),
    Reanalysis(ReanalysisForcing),
    FieldStation(FieldStationForcing),
    Radiative(RadiativeForcing),
}

impl Default for ForcingConfig {
    fn default() -> Self {
        ForcingConfig::Constant(ConstantForcing::default())
    }
}

impl ForcingConfig {
    /// Forcing read from dimensional data or irradiances needs conversion scales.
    pub fn needs_scales(&self) -> bool {
        matches!(
            self,
            ForcingConfig::Reanalysis(_) | ForcingConfig::FieldStation(_) | ForcingConfig::Radiative(_)
        )
    }

    /// Short label used in log messages.
    pub fn label(&self) -> &'static str {
        match self {
            ForcingConfig::Constant(_) => "constant",
            ForcingConfig::Yearly(_) => "yearly",
            ForcingConfig::Reanalysis(_) => "reanalysis",
            ForcingConfig::FieldStation(_) => "field_station",
            ForcingConfig::Radiative(_) => "radiative",
        }
    }
}

// =============================================================================
// Ocean boundary
// =============================================================================

/// Ocean (bottom boundary) temperature condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OceanForcingConfig {
    /// Ghost temperature held at `far_temp`.
    #[default]
    FixedTemperature,
    /// Non-dimensional heat flux into the column through the bottom boundary.
    FixedHeatFlux { heat_flux: f64 },
    /// Ocean temperature interpolated from a field-station record.
    FieldStation { data_path: PathBuf },
}

impl OceanForcingConfig {
    pub fn needs_scales(&self) -> bool {
        matches!(self, OceanForcingConfig::FieldStation { .. })
    }
}

/// Far-field ocean values used for the bottom ghost cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Dissolved gas saturation of the ocean.
    /// default: 1.0
    pub far_gas_sat: f64,
    /// Non-dimensional ocean temperature.
    /// default: 0.1
    pub far_temp: f64,
    /// Non-dimensional ocean bulk salinity.
    /// default: 0.0
    pub far_bulk_salinity: f64,
    /// default: fixed temperature
    pub ocean: OceanForcingConfig,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            far_gas_sat: 1.0,
            far_temp: 0.1,
            far_bulk_salinity: 0.0,
            ocean: OceanForcingConfig::FixedTemperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forcing_yaml_tags() {
        let yaml = "type: yearly\namplitude: 1.0\n";
        let forcing: ForcingConfig = serde_yaml::from_str(yaml).unwrap();
        match forcing {
            ForcingConfig::Yearly(y) => {
                assert_eq!(y.amplitude, 1.0);
                assert_eq!(y.period, 4.0);
                assert_eq!(y.offset, -1.0);
            }
            other => panic!("Expected yearly forcing, got {:?}", other),
        }
    }

    #[test]
    fn test_ocean_heat_flux_yaml() {
        let yaml = "type: fixed_heat_flux\nheat_flux: 0.5\n";
        let ocean: OceanForcingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ocean, OceanForcingConfig::FixedHeatFlux { heat_flux: 0.5 });
        assert!(!ocean.needs_scales());
    }

    #[test]
    fn test_field_station_columns() {
        assert_eq!(FieldStationRecord::Air.column(), 8);
        assert_eq!(FieldStationRecord::BottomSnow.column(), 18);
        assert_eq!(FieldStationRecord::TopIce.column(), 19);
    }
}
