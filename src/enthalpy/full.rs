//! Full equilibrium enthalpy method.
//!
//! Bubbles occupy volume, so once the liquid is saturated the gas fraction
//! enters the heat and salt balances and the phase boundaries move. Each of
//! the four thermodynamic regions splits into a sub-saturated regime (all gas
//! dissolved) and a super-saturated regime (dissolved gas at saturation,
//! excess as bubbles), giving eight closed-form cases.

use crate::config::PhysicalParams;
use crate::solver::PrimeCell;

use super::phase_boundaries::{self, PhaseRegion};
use super::{CellPhase, EnthalpyMethod, PhaseSolveError};

/// EQM enthalpy method with gas coupled into the energy balance.
#[derive(Clone, Debug)]
pub struct FullEnthalpy {
    params: PhysicalParams,
}

impl FullEnthalpy {
    pub fn new(params: PhysicalParams) -> Self {
        Self { params }
    }

    fn discriminant_error(cell: usize, prime: PrimeCell, discriminant: f64) -> PhaseSolveError {
        PhaseSolveError::NegativeDiscriminant {
            cell,
            enthalpy: prime.enthalpy,
            salt: prime.salt,
            discriminant,
        }
    }
}

impl EnthalpyMethod for FullEnthalpy {
    fn name(&self) -> &'static str {
        "full"
    }

    fn solve_cell(&self, cell: usize, prime: PrimeCell) -> Result<CellPhase, PhaseSolveError> {
        let chi = self.params.expansion_coefficient;
        let st = self.params.stefan_number;
        let c = self.params.concentration_ratio;
        let PrimeCell {
            enthalpy: h,
            salt: s,
            gas: g,
            ..
        } = prime;

        let regime = phase_boundaries::regime(h, s, g, &self.params).ok_or_else(|| {
            let b = h + c + st;
            Self::discriminant_error(cell, prime, b * b - 4.0 * (c * h - st * s))
        })?;

        // Gas fraction of a super-saturated liquid
        let liquid_gas_fraction = (g - chi) / (1.0 - chi);

        let (temperature, liquid_fraction) = match (regime.region, regime.super_saturated) {
            (PhaseRegion::Liquid, false) => (h, 1.0),
            (PhaseRegion::Liquid, true) => {
                let liquid_fraction = 1.0 - liquid_gas_fraction;
                (h / liquid_fraction, liquid_fraction)
            }
            (PhaseRegion::Mush, false) => {
                let b = h + c + st;
                let discriminant = b * b - 4.0 * (c * h - st * s);
                if discriminant < 0.0 {
                    return Err(Self::discriminant_error(cell, prime, discriminant));
                }
                let temperature = 0.5 * (b - discriminant.sqrt());
                (temperature, 1.0 - (temperature - h) / st)
            }
            (PhaseRegion::Mush, true) => {
                let a = 1.0 - g;
                let b = (c + st) * (1.0 - g) + h + s * chi + c * chi;
                let k = c * h - (1.0 - chi) * st * s - c * st * (g - chi);
                let discriminant = b * b - 4.0 * a * k;
                if discriminant < 0.0 {
                    return Err(Self::discriminant_error(cell, prime, discriminant));
                }
                let temperature = (b - discriminant.sqrt()) / (2.0 * a);
                (temperature, (s + c) / (c - temperature))
            }
            (PhaseRegion::Eutectic, false) => (-1.0, (h + 1.0) / st + 1.0),
            (PhaseRegion::Eutectic, true) => (
                -1.0,
                ((1.0 - g) * (1.0 + st) + h) / (st * (1.0 - chi) - chi),
            ),
            (PhaseRegion::Solid, false) => (h + st, 0.0),
            (PhaseRegion::Solid, true) => (h / (1.0 - g) + st, 0.0),
        };

        let gas_fraction = match (regime.region, regime.super_saturated) {
            (_, false) => 0.0,
            (PhaseRegion::Liquid, true) => liquid_gas_fraction,
            (PhaseRegion::Mush, true) | (PhaseRegion::Eutectic, true) => g - chi * liquid_fraction,
            (PhaseRegion::Solid, true) => g,
        };

        let liquid_salinity = match (regime.region, regime.super_saturated) {
            (PhaseRegion::Liquid, false) => s,
            (PhaseRegion::Liquid, true) => {
                (s + liquid_gas_fraction * c) / (1.0 - liquid_gas_fraction)
            }
            (PhaseRegion::Mush, _) => -temperature,
            (PhaseRegion::Eutectic, _) | (PhaseRegion::Solid, _) => 1.0,
        };

        let dissolved_gas = match (regime.region, regime.super_saturated) {
            (PhaseRegion::Liquid, false) => g / chi,
            (PhaseRegion::Mush, false) | (PhaseRegion::Eutectic, false) => {
                if liquid_fraction > 0.0 {
                    g / (chi * liquid_fraction)
                } else {
                    1.0
                }
            }
            _ => 1.0,
        };

        Ok(CellPhase {
            solid_fraction: 1.0 - liquid_fraction - gas_fraction,
            liquid_fraction,
            gas_fraction,
            temperature,
            liquid_salinity,
            dissolved_gas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enthalpy::ReducedEnthalpy;

    fn cell(enthalpy: f64, salt: f64, gas: f64) -> PrimeCell {
        PrimeCell {
            enthalpy,
            salt,
            gas,
            gas_fraction: 0.0,
        }
    }

    #[test]
    fn test_gas_free_matches_reduced() {
        let params = PhysicalParams::default();
        let full = FullEnthalpy::new(params.clone());
        let reduced = ReducedEnthalpy::new(params);
        for h in [0.3, -0.2, -1.5, -3.0, -5.0, -6.5] {
            let a = full.solve_cell(0, cell(h, 0.05, 0.0)).unwrap();
            let b = reduced.solve_cell(0, cell(h, 0.05, 0.0)).unwrap();
            assert!(
                (a.temperature - b.temperature).abs() < 1e-10,
                "Temperature mismatch at H={}: {} vs {}",
                h,
                a.temperature,
                b.temperature
            );
            assert!((a.solid_fraction - b.solid_fraction).abs() < 1e-10);
            assert!((a.liquid_salinity - b.liquid_salinity).abs() < 1e-10);
        }
    }

    #[test]
    fn test_super_saturated_liquid() {
        let params = PhysicalParams::default();
        let chi = params.expansion_coefficient;
        let full = FullEnthalpy::new(params);
        let phase = full.solve_cell(0, cell(0.5, 0.0, 2.0 * chi)).unwrap();
        let gas_fraction = chi / (1.0 - chi);
        assert!((phase.gas_fraction - gas_fraction).abs() < 1e-14);
        assert!((phase.liquid_fraction - (1.0 - gas_fraction)).abs() < 1e-14);
        assert!(phase.solid_fraction.abs() < 1e-14);
        assert!((phase.temperature - 0.5 / (1.0 - gas_fraction)).abs() < 1e-12);
        assert_eq!(phase.dissolved_gas, 1.0);
    }

    #[test]
    fn test_sub_saturated_mush_dissolved_gas() {
        let params = PhysicalParams::default();
        let chi = params.expansion_coefficient;
        let full = FullEnthalpy::new(params);
        let phase = full.solve_cell(0, cell(-1.0, 0.0, 0.1 * chi)).unwrap();
        assert_eq!(phase.gas_fraction, 0.0);
        let expected = 0.1 / phase.liquid_fraction;
        assert!((phase.dissolved_gas - expected).abs() < 1e-12);
    }
}
