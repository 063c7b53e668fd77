//! Ocean (bottom) temperature condition.

use super::forcing::{SeriesTemperature, TemperatureForcing};
use super::BoundaryContext;
use crate::io::ForcingLookupError;

/// Temperature of the ocean ghost cell.
#[derive(Clone, Debug)]
pub enum OceanForcing {
    /// Ghost cell held at the far-field temperature.
    FixedTemperature(f64),
    /// Prescribed conductive heat flux into the column: the ghost value is
    /// `T_0 + F step / k_e`, with T_0 the bottom cell temperature and k_e
    /// the effective conductivity of the bottom edge.
    FixedHeatFlux(f64),
    /// Recorded ocean temperature.
    Series(SeriesTemperature),
}

impl OceanForcing {
    pub fn ghost_temperature(&self, ctx: &BoundaryContext) -> Result<f64, ForcingLookupError> {
        match self {
            OceanForcing::FixedTemperature(temperature) => Ok(*temperature),
            OceanForcing::FixedHeatFlux(flux) => {
                Ok(ctx.interior.temperature + flux * ctx.step / ctx.conductivity)
            }
            OceanForcing::Series(series) => series.temperature(ctx.time),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OceanForcing::FixedTemperature(_) => "fixed_temperature",
            OceanForcing::FixedHeatFlux(_) => "fixed_heat_flux",
            OceanForcing::Series(_) => "series",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::GhostCell;

    fn context(temperature: f64, conductivity: f64) -> BoundaryContext {
        BoundaryContext {
            time: 0.0,
            interior: GhostCell {
                temperature,
                ..Default::default()
            },
            conductivity,
            step: 0.1,
        }
    }

    #[test]
    fn test_fixed_temperature() {
        let ocean = OceanForcing::FixedTemperature(0.1);
        assert_eq!(ocean.ghost_temperature(&context(-0.5, 1.0)).unwrap(), 0.1);
    }

    #[test]
    fn test_heat_flux_gradient() {
        let ocean = OceanForcing::FixedHeatFlux(2.0);
        for k in [1.0, 10.0] {
            let ghost = ocean.ghost_temperature(&context(-0.5, k)).unwrap();
            // Upward conductive flux -k (T_0 - T_ghost)/step equals F
            assert!((k * (ghost - -0.5) / 0.1 - 2.0).abs() < 1e-12);
        }
    }
}
