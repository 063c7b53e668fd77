//! Initial prime state of a run.
//!
//! - Uniform: the far-field ocean values in every cell, fully liquid.
//! - Field station: a 0.7 m ice layer at -8.15 °C over -1.8 °C ocean.
//! - Summer: a configured ice layer over a slightly supercooled ocean.
//!
//! Inside an ice layer the enthalpy is found by inverting the mush
//! relation for the given temperature and bulk salinity.

use crate::config::{
    Config, ConfigError, InitialConditionsConfig, ModelChoice, PhysicalParams, Scales,
};
use crate::mesh::Grid;
use crate::solver::State;

/// Depth of the field-station ice layer (m).
pub const FIELD_STATION_ICE_DEPTH: f64 = 0.7;
/// Bulk salinity of an initial ice layer (g/kg).
pub const ICE_LAYER_SALINITY: f64 = 5.92;
/// Temperature of the field-station ice (°C).
pub const FIELD_STATION_ICE_TEMPERATURE: f64 = -8.15;
/// Temperature of the field-station ocean (°C).
pub const FIELD_STATION_OCEAN_TEMPERATURE: f64 = -1.8;

/// Enthalpy of mush at temperature `T` and bulk salinity `S`:
/// `φs = (S + T) / (T - C)`, `H = T - φs St`.
pub fn mush_enthalpy(temperature: f64, salt: f64, params: &PhysicalParams) -> f64 {
    let solid_fraction = (salt + temperature) / (temperature - params.concentration_ratio);
    temperature - solid_fraction * params.stefan_number
}

/// Ice layer of depth `depth` on top of liquid.
#[derive(Clone, Copy, Debug)]
struct IceLayer {
    depth: f64,
    ice: (f64, f64, f64),
    liquid: (f64, f64, f64),
}

/// Initial state for the configured initial condition.
pub fn initial_state(cfg: &Config, grid: &Grid) -> Result<State, ConfigError> {
    let far = &cfg.boundary_config;
    let chi = cfg.physical_params.expansion_coefficient;
    let ocean_gas = chi * far.far_gas_sat;

    let layer = match &cfg.initial_conditions_config {
        InitialConditionsConfig::Uniform => {
            let n = grid.n_cells();
            return Ok(model_state(
                cfg.model,
                vec![far.far_temp; n],
                vec![far.far_bulk_salinity; n],
                vec![ocean_gas; n],
            ));
        }
        InitialConditionsConfig::FieldStation(ic) => {
            let scales = required_scales(cfg, "field station initial conditions")?;
            // Brine convection desalinates the ice by itself
            let ice_salt = if cfg.brine_convection.rjw14().is_some() {
                far.far_bulk_salinity
            } else {
                scales.convert_from_dimensional_bulk_salinity(ICE_LAYER_SALINITY)
            };
            IceLayer {
                depth: scales.convert_from_dimensional_grid(FIELD_STATION_ICE_DEPTH),
                ice: (
                    scales.convert_from_dimensional_temperature(FIELD_STATION_ICE_TEMPERATURE),
                    ice_salt,
                    ic.initial_bulk_gas_in_ice * chi,
                ),
                liquid: (
                    scales.convert_from_dimensional_temperature(FIELD_STATION_OCEAN_TEMPERATURE),
                    far.far_bulk_salinity,
                    ocean_gas,
                ),
            }
        }
        InitialConditionsConfig::Summer(ic) => {
            let scales = required_scales(cfg, "summer initial conditions")?;
            IceLayer {
                depth: ic.initial_summer_ice_depth,
                ice: (
                    ic.initial_summer_ice_temperature,
                    scales.convert_from_dimensional_bulk_salinity(ICE_LAYER_SALINITY),
                    0.0,
                ),
                liquid: (
                    ic.initial_summer_ocean_temperature,
                    far.far_bulk_salinity,
                    0.0,
                ),
            }
        }
    };

    Ok(ice_layer_state(cfg, grid, layer))
}

fn required_scales<'a>(cfg: &'a Config, what: &'static str) -> Result<&'a Scales, ConfigError> {
    cfg.scales.as_ref().ok_or(ConfigError::MissingScales(what))
}

fn ice_layer_state(cfg: &Config, grid: &Grid, layer: IceLayer) -> State {
    let n = grid.n_cells();
    let mut enthalpy = Vec::with_capacity(n);
    let mut salt = Vec::with_capacity(n);
    let mut gas = Vec::with_capacity(n);
    for &z in grid.centers() {
        if z > -layer.depth {
            let (t, s, g) = layer.ice;
            enthalpy.push(mush_enthalpy(t, s, &cfg.physical_params));
            salt.push(s);
            gas.push(g);
        } else {
            let (t, s, g) = layer.liquid;
            enthalpy.push(t);
            salt.push(s);
            gas.push(g);
        }
    }
    model_state(cfg.model, enthalpy, salt, gas)
}

/// DISEQ runs start with all gas dissolved.
fn model_state(model: ModelChoice, enthalpy: Vec<f64>, salt: Vec<f64>, gas: Vec<f64>) -> State {
    match model {
        ModelChoice::Eqm => State::eqm(0.0, enthalpy, salt, gas),
        ModelChoice::Diseq => {
            let gas_fraction = vec![0.0; gas.len()];
            State::diseq(0.0, enthalpy, salt, gas, gas_fraction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DimensionalParams, SummerInitialConditions};
    use crate::enthalpy::{EnthalpyMethod, EnthalpyMethodKind};

    #[test]
    fn test_uniform_is_far_field() {
        let cfg = Config::default().with_model(ModelChoice::Diseq);
        let grid = Grid::new(5);
        let state = initial_state(&cfg, &grid).unwrap();
        let chi = cfg.physical_params.expansion_coefficient;
        assert_eq!(state.n_cells(), 5);
        assert!(state.enthalpy.iter().all(|&h| h == cfg.boundary_config.far_temp));
        assert!(state.gas.iter().all(|&g| (g - chi).abs() < 1e-15));
        assert!(state.gas_fraction.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_mush_enthalpy_recovers_temperature() {
        let cfg = Config::default();
        let params = &cfg.physical_params;
        let (t, s) = (-0.3, -0.1);
        let h = mush_enthalpy(t, s, params);
        let method = EnthalpyMethodKind::from_config(&cfg);
        let phase = method
            .solve_cell(
                0,
                crate::solver::PrimeCell {
                    enthalpy: h,
                    salt: s,
                    gas: 0.0,
                    gas_fraction: 0.0,
                },
            )
            .unwrap();
        assert!((phase.temperature - t).abs() < 1e-10);
    }

    #[test]
    fn test_ice_layer_needs_scales() {
        let cfg = Config::default()
            .with_initial_conditions(InitialConditionsConfig::Summer(Default::default()));
        assert!(matches!(
            initial_state(&cfg, &Grid::new(4)),
            Err(ConfigError::MissingScales(_))
        ));
    }

    #[test]
    fn test_summer_layer_on_top() {
        let mut cfg = DimensionalParams::default().to_config();
        cfg.initial_conditions_config = InitialConditionsConfig::Summer(SummerInitialConditions {
            initial_summer_ice_depth: 0.5,
            ..Default::default()
        });
        let grid = Grid::new(4);
        let state = initial_state(&cfg, &grid).unwrap();
        // Bottom two cells are ocean, top two are ice
        assert_eq!(state.enthalpy[0], -0.05);
        assert!(state.enthalpy[3] < -0.1);
        assert!(state.gas.iter().all(|&g| g == 0.0));
    }
}
