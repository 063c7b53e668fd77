//! Disequilibrium enthalpy method.
//!
//! Gas fraction is a prime variable, so the solve only has to partition the
//! remaining volume between solid and liquid and express the dissolved gas
//! per unit liquid.

use crate::config::PhysicalParams;
use crate::solver::PrimeCell;

use super::phase_boundaries::PhaseRegion;
use super::reduced::solve_solid;
use super::{CellPhase, EnthalpyMethod, PhaseSolveError};

/// Keeps the eutectic dissolved gas finite as the last liquid freezes.
const EUTECTIC_LIQUID_FLOOR: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct DisequilibriumEnthalpy {
    params: PhysicalParams,
}

impl DisequilibriumEnthalpy {
    pub fn new(params: PhysicalParams) -> Self {
        Self { params }
    }
}

impl EnthalpyMethod for DisequilibriumEnthalpy {
    fn name(&self) -> &'static str {
        "disequilibrium"
    }

    fn solve_cell(&self, cell: usize, prime: PrimeCell) -> Result<CellPhase, PhaseSolveError> {
        let chi = self.params.expansion_coefficient;
        let solid = solve_solid(cell, prime.enthalpy, prime.salt, &self.params)?;
        // Bubbles displace solid before liquid once the pore space is gone
        let solid_fraction = solid.solid_fraction.min(1.0 - prime.gas_fraction);
        let liquid_fraction = 1.0 - solid_fraction - prime.gas_fraction;

        let dissolved_gas = match solid.region {
            PhaseRegion::Liquid => prime.gas / chi,
            PhaseRegion::Mush if liquid_fraction > 0.0 => prime.gas / (chi * liquid_fraction),
            PhaseRegion::Mush | PhaseRegion::Eutectic => {
                prime.gas / (chi * liquid_fraction + EUTECTIC_LIQUID_FLOOR)
            }
            PhaseRegion::Solid => 0.0,
        };

        Ok(CellPhase {
            solid_fraction,
            liquid_fraction,
            gas_fraction: prime.gas_fraction,
            temperature: solid.temperature,
            liquid_salinity: solid.liquid_salinity,
            dissolved_gas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_fraction_passed_through() {
        let method = DisequilibriumEnthalpy::new(PhysicalParams::default());
        let phase = method
            .solve_cell(
                0,
                PrimeCell {
                    enthalpy: -1.0,
                    salt: 0.0,
                    gas: 0.01,
                    gas_fraction: 0.05,
                },
            )
            .unwrap();
        assert_eq!(phase.gas_fraction, 0.05);
        let sum = phase.solid_fraction + phase.liquid_fraction + phase.gas_fraction;
        assert!((sum - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_solid_holds_no_dissolved_gas() {
        let method = DisequilibriumEnthalpy::new(PhysicalParams::default());
        let phase = method
            .solve_cell(
                0,
                PrimeCell {
                    enthalpy: -8.0,
                    salt: 0.0,
                    gas: 0.01,
                    gas_fraction: 0.0,
                },
            )
            .unwrap();
        assert_eq!(phase.dissolved_gas, 0.0);
        assert_eq!(phase.solid_fraction, 1.0);
    }

    #[test]
    fn test_bubbles_displace_solid() {
        let method = DisequilibriumEnthalpy::new(PhysicalParams::default());
        let phase = method
            .solve_cell(
                0,
                PrimeCell {
                    enthalpy: -6.0,
                    salt: 0.0,
                    gas: 0.0,
                    gas_fraction: 0.05,
                },
            )
            .unwrap()
            .checked(0)
            .unwrap();
        assert!((phase.solid_fraction - 0.95).abs() < 1e-14);
        assert!(phase.liquid_fraction.abs() < 1e-14);
    }
}
