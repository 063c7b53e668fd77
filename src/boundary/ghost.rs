//! Ghost cell values of every field at both ends of the column.
//!
//! | Field | Ocean ghost | Surface ghost |
//! |-------|-------------|---------------|
//! | temperature | ocean forcing | surface forcing |
//! | enthalpy | ocean temperature (liquid) | extrapolated |
//! | bulk and brine salinity | far-field salinity | extrapolated |
//! | bulk (dissolved) gas | χ · far_gas_sat | χ |
//! | dissolved gas | far_gas_sat | 1 |
//! | solid and liquid fraction | extrapolated | extrapolated |
//! | gas fraction | extrapolated | 0 |

use thiserror::Error;

use super::forcing::{ConstantTemperature, SeriesTemperature, TemperatureForcing, YearlyTemperature};
use super::ocean::OceanForcing;
use super::surface_energy_balance::SurfaceEnergyBalance;
use super::BoundaryContext;
use crate::closures::{conductivity, eddy_diffusivity};
use crate::config::{
    BoundaryConfig, Config, ConfigError, FIELD_STATION_OCEAN_COLUMN, FIELD_STATION_TIME_COLUMN,
    ForcingConfig, OceanForcingConfig, PhysicalParams, Scales,
};
use crate::io::{
    DEFAULT_MISSING_THRESHOLD, ForcingLookupError, ForcingSeriesError, read_forcing_series,
};
use crate::mesh::BoundaryFace;
use crate::solver::{GhostCell, StateBCs, StateFull};

/// Failure to set up boundary forcing from a configuration.
#[derive(Debug, Error)]
pub enum ForcingSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Series(#[from] ForcingSeriesError),
}

/// Temperature at the top of the column.
pub enum SurfaceForcing {
    Prescribed(Box<dyn TemperatureForcing>),
    EnergyBalance(SurfaceEnergyBalance),
}

impl SurfaceForcing {
    pub fn ghost_temperature(&self, ctx: &BoundaryContext) -> Result<f64, ForcingLookupError> {
        match self {
            SurfaceForcing::Prescribed(forcing) => forcing.temperature(ctx.time),
            SurfaceForcing::EnergyBalance(balance) => Ok(balance.surface_temperature(
                ctx.interior.temperature,
                ctx.conductivity,
                ctx.step,
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SurfaceForcing::Prescribed(forcing) => forcing.name(),
            SurfaceForcing::EnergyBalance(_) => "surface_energy_balance",
        }
    }
}

impl std::fmt::Debug for SurfaceForcing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SurfaceForcing").field(&self.name()).finish()
    }
}

fn require_scales<'a>(cfg: &'a Config, what: &'static str) -> Result<&'a Scales, ConfigError> {
    cfg.scales.as_ref().ok_or(ConfigError::MissingScales(what))
}

/// Boundary policy of one run.
#[derive(Debug)]
pub struct BoundaryConditions {
    surface: SurfaceForcing,
    ocean: OceanForcing,
    far: BoundaryConfig,
    params: PhysicalParams,
    step: f64,
}

impl BoundaryConditions {
    pub fn new(
        surface: SurfaceForcing,
        ocean: OceanForcing,
        far: BoundaryConfig,
        params: PhysicalParams,
        step: f64,
    ) -> Self {
        Self {
            surface,
            ocean,
            far,
            params,
            step,
        }
    }

    /// Build the forcing described by `cfg`, reading any data records.
    pub fn from_config(cfg: &Config) -> Result<Self, ForcingSetupError> {
        let surface = match &cfg.forcing_config {
            ForcingConfig::Constant(c) => SurfaceForcing::Prescribed(Box::new(
                ConstantTemperature::new(c.constant_top_temperature),
            )),
            ForcingConfig::Yearly(y) => {
                SurfaceForcing::Prescribed(Box::new(YearlyTemperature::from(y)))
            }
            ForcingConfig::Reanalysis(r) => {
                let scales = require_scales(cfg, "reanalysis forcing")?;
                let series = read_forcing_series(
                    &r.data_path,
                    r.time_column,
                    r.temperature_column,
                    DEFAULT_MISSING_THRESHOLD,
                )?;
                SurfaceForcing::Prescribed(Box::new(SeriesTemperature::new(series, scales.clone())))
            }
            ForcingConfig::FieldStation(f) => {
                let scales = require_scales(cfg, "field station forcing")?;
                let series = read_forcing_series(
                    &f.data_path,
                    FIELD_STATION_TIME_COLUMN,
                    f.top_temperature_record.column(),
                    DEFAULT_MISSING_THRESHOLD,
                )?;
                SurfaceForcing::Prescribed(Box::new(SeriesTemperature::new(series, scales.clone())))
            }
            ForcingConfig::Radiative(r) => {
                if r.surface_energy_balance_forcing {
                    let scales = require_scales(cfg, "surface energy balance")?;
                    SurfaceForcing::EnergyBalance(SurfaceEnergyBalance::new(r, scales.clone()))
                } else {
                    SurfaceForcing::Prescribed(Box::new(ConstantTemperature::new(
                        r.constant_top_temperature,
                    )))
                }
            }
        };

        let ocean = match &cfg.boundary_config.ocean {
            OceanForcingConfig::FixedTemperature => {
                OceanForcing::FixedTemperature(cfg.boundary_config.far_temp)
            }
            OceanForcingConfig::FixedHeatFlux { heat_flux } => {
                OceanForcing::FixedHeatFlux(*heat_flux)
            }
            OceanForcingConfig::FieldStation { data_path } => {
                let scales = require_scales(cfg, "field station ocean forcing")?;
                let series = read_forcing_series(
                    data_path,
                    FIELD_STATION_TIME_COLUMN,
                    FIELD_STATION_OCEAN_COLUMN,
                    DEFAULT_MISSING_THRESHOLD,
                )?;
                OceanForcing::Series(SeriesTemperature::new(series, scales.clone()))
            }
        };

        Ok(Self::new(
            surface,
            ocean,
            cfg.boundary_config.clone(),
            cfg.physical_params.clone(),
            cfg.numerical_params.step(),
        ))
    }

    pub fn surface(&self) -> &SurfaceForcing {
        &self.surface
    }

    pub fn ocean(&self) -> &OceanForcing {
        &self.ocean
    }

    fn context(&self, full: &StateFull, face: BoundaryFace) -> BoundaryContext {
        let cell = match face {
            BoundaryFace::Bottom => 0,
            BoundaryFace::Top => full.n_cells() - 1,
        };
        let interior = GhostCell::from_interior(full, cell);
        let molecular = conductivity(interior.liquid_fraction, interior.solid_fraction, &self.params);
        let eddy = eddy_diffusivity(interior.liquid_fraction, self.params.eddy_diffusivity_ratio);
        BoundaryContext {
            time: full.time(),
            conductivity: molecular + eddy,
            interior,
            step: self.step,
        }
    }

    /// Ghost values at the ocean boundary.
    pub fn bottom_ghost(&self, full: &StateFull) -> Result<GhostCell, ForcingLookupError> {
        let ctx = self.context(full, BoundaryFace::Bottom);
        let temperature = self.ocean.ghost_temperature(&ctx)?;
        let chi = self.params.expansion_coefficient;
        Ok(GhostCell {
            enthalpy: temperature,
            salt: self.far.far_bulk_salinity,
            gas: chi * self.far.far_gas_sat,
            temperature,
            liquid_salinity: self.far.far_bulk_salinity,
            dissolved_gas: self.far.far_gas_sat,
            ..ctx.interior
        })
    }

    /// Ghost values at the surface boundary.
    pub fn top_ghost(&self, full: &StateFull) -> Result<GhostCell, ForcingLookupError> {
        let ctx = self.context(full, BoundaryFace::Top);
        let temperature = self.surface.ghost_temperature(&ctx)?;
        Ok(GhostCell {
            gas: self.params.expansion_coefficient,
            temperature,
            dissolved_gas: 1.0,
            gas_fraction: 0.0,
            ..ctx.interior
        })
    }

    /// Pad every field of `full` with ghost cells.
    pub fn apply(&self, full: &StateFull) -> Result<StateBCs, ForcingLookupError> {
        let bottom = self.bottom_ghost(full)?;
        let top = self.top_ghost(full)?;
        Ok(StateBCs::new(full, bottom, top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enthalpy::EnthalpyMethodKind;
    use crate::solver::State;

    fn full_state(cfg: &Config) -> StateFull {
        let state = State::eqm(
            0.0,
            vec![0.2, -2.0, -3.0],
            vec![0.0, -0.1, -0.2],
            vec![0.02, 0.03, 0.04],
        );
        StateFull::from_state(state, &EnthalpyMethodKind::from_config(cfg)).unwrap()
    }

    #[test]
    fn test_ghost_values() {
        let cfg = Config::default().with_numerical_params(crate::config::NumericalParams {
            n_cells: 3,
            ..Default::default()
        });
        let bcs = BoundaryConditions::from_config(&cfg).unwrap();
        let full = full_state(&cfg);
        let padded = bcs.apply(&full).unwrap();

        let chi = cfg.physical_params.expansion_coefficient;
        assert_eq!(padded.temperature[0], 0.1);
        assert_eq!(padded.enthalpy[0], 0.1);
        assert_eq!(padded.temperature[4], -1.5);
        assert_eq!(padded.enthalpy[4], -3.0);
        assert_eq!(padded.salt[4], -0.2);
        assert_eq!(padded.salt[0], 0.0);
        assert!((padded.gas[0] - chi).abs() < 1e-15);
        assert!((padded.gas[4] - chi).abs() < 1e-15);
        assert_eq!(padded.dissolved_gas[4], 1.0);
        assert_eq!(padded.gas_fraction[4], 0.0);
        assert_eq!(padded.gas_fraction[0], full.phase.gas_fraction[0]);
        assert_eq!(padded.liquid_fraction[0], full.phase.liquid_fraction[0]);
        assert_eq!(padded.liquid_fraction[4], full.phase.liquid_fraction[2]);
    }

    #[test]
    fn test_series_forcing_requires_scales() {
        let cfg = Config::default().with_forcing(ForcingConfig::FieldStation(Default::default()));
        assert!(matches!(
            BoundaryConditions::from_config(&cfg),
            Err(ForcingSetupError::Config(ConfigError::MissingScales(_)))
        ));
    }
}
