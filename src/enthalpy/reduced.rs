//! Reduced enthalpy method.
//!
//! The solid fraction and temperature follow from enthalpy and salinity
//! alone. Bulk gas is then split between solution and bubbles: the liquid
//! holds up to `χ τ` per unit volume of liquid (τ the tolerable
//! super-saturation fraction) and any excess forms bubbles in the pore
//! space left by the solid.
//!
//! Saturation cap: bubbles fill at most the pore space `1 - φs`. Bulk gas
//! beyond that has no volume to occupy and is left out of the phase
//! fractions, while the prime variable `G` keeps it, so the gas budget of
//! the column is unaffected.

use crate::config::PhysicalParams;
use crate::solver::PrimeCell;

use super::phase_boundaries::{PhaseRegion, reduced_region};
use super::{CellPhase, EnthalpyMethod, PhaseSolveError};

/// Solid fraction, temperature and liquid salinity of the gas free system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SolidState {
    pub region: PhaseRegion,
    pub solid_fraction: f64,
    pub temperature: f64,
    pub liquid_salinity: f64,
}

/// Gas free phase solve shared with the disequilibrium model.
pub(crate) fn solve_solid(
    cell: usize,
    enthalpy: f64,
    salt: f64,
    params: &PhysicalParams,
) -> Result<SolidState, PhaseSolveError> {
    let st = params.stefan_number;
    let region = reduced_region(enthalpy, salt, params);
    let (solid_fraction, temperature, liquid_salinity) = match region {
        PhaseRegion::Liquid => (0.0, enthalpy, salt),
        PhaseRegion::Mush => {
            // St φs² + (H - St - C) φs - (H + S) = 0, smaller root
            let a = st;
            let b = enthalpy - st - params.concentration_ratio;
            let c = -(enthalpy + salt);
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return Err(PhaseSolveError::NegativeDiscriminant {
                    cell,
                    enthalpy,
                    salt,
                    discriminant,
                });
            }
            let solid_fraction = (-b - discriminant.sqrt()) / (2.0 * a);
            let temperature = enthalpy + solid_fraction * st;
            (solid_fraction, temperature, -temperature)
        }
        PhaseRegion::Eutectic => (-(1.0 + enthalpy) / st, -1.0, 1.0),
        PhaseRegion::Solid => (1.0, enthalpy + st, 1.0),
    };
    Ok(SolidState {
        region,
        solid_fraction,
        temperature,
        liquid_salinity,
    })
}

/// EQM enthalpy method with gas decoupled from the energy balance.
#[derive(Clone, Debug)]
pub struct ReducedEnthalpy {
    params: PhysicalParams,
}

impl ReducedEnthalpy {
    pub fn new(params: PhysicalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PhysicalParams {
        &self.params
    }
}

impl EnthalpyMethod for ReducedEnthalpy {
    fn name(&self) -> &'static str {
        "reduced"
    }

    fn solve_cell(&self, cell: usize, prime: PrimeCell) -> Result<CellPhase, PhaseSolveError> {
        let chi = self.params.expansion_coefficient;
        let tau = self.params.tolerable_super_saturation_fraction;
        let solid = solve_solid(cell, prime.enthalpy, prime.salt, &self.params)?;

        let pore_space = 1.0 - solid.solid_fraction;
        let saturation = chi * pore_space * tau;
        let (gas_fraction, dissolved_gas) = if prime.gas >= saturation {
            ((prime.gas - saturation).min(pore_space), tau)
        } else if pore_space > 0.0 {
            (0.0, prime.gas / (chi * pore_space))
        } else {
            (0.0, 0.0)
        };

        Ok(CellPhase {
            solid_fraction: solid.solid_fraction,
            liquid_fraction: pore_space - gas_fraction,
            gas_fraction,
            temperature: solid.temperature,
            liquid_salinity: solid.liquid_salinity,
            dissolved_gas,
        })
    }

    /// Analytic dT/dH: unity in liquid and solid, zero on the eutectic, and the
    /// derivative of `H + St φs(H)` in the mush.
    fn temperature_derivative(&self, prime: PrimeCell) -> f64 {
        let st = self.params.stefan_number;
        match reduced_region(prime.enthalpy, prime.salt, &self.params) {
            PhaseRegion::Liquid | PhaseRegion::Solid => 1.0,
            PhaseRegion::Eutectic => 0.0,
            PhaseRegion::Mush => {
                let b = prime.enthalpy - st - self.params.concentration_ratio;
                let discriminant = b * b + 4.0 * st * (prime.enthalpy + prime.salt);
                if discriminant <= 0.0 {
                    return 0.0;
                }
                0.5 * (1.0 - (b + 2.0 * st) / discriminant.sqrt())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> ReducedEnthalpy {
        ReducedEnthalpy::new(PhysicalParams::default())
    }

    fn cell(enthalpy: f64, salt: f64, gas: f64) -> PrimeCell {
        PrimeCell {
            enthalpy,
            salt,
            gas,
            gas_fraction: 0.0,
        }
    }

    #[test]
    fn test_liquid_cell() {
        let phase = method().solve_cell(0, cell(0.1, 0.0, 0.0)).unwrap();
        assert_eq!(phase.solid_fraction, 0.0);
        assert_eq!(phase.liquid_fraction, 1.0);
        assert!((phase.temperature - 0.1).abs() < 1e-14);
        assert_eq!(phase.liquid_salinity, 0.0);
    }

    #[test]
    fn test_mush_satisfies_liquidus() {
        let params = PhysicalParams::default();
        let (h, s) = (-1.0, 0.0);
        let phase = method().solve_cell(0, cell(h, s, 0.0)).unwrap();
        assert!(phase.solid_fraction > 0.0 && phase.solid_fraction < 1.0);
        // Salt balance: S = (1 - φs) Θl - φs C with Θl = -T
        let residual = (1.0 - phase.solid_fraction) * phase.liquid_salinity
            - phase.solid_fraction * params.concentration_ratio
            - s;
        assert!(residual.abs() < 1e-12, "Salt balance residual {}", residual);
        assert!((phase.liquid_salinity + phase.temperature).abs() < 1e-14);
    }

    #[test]
    fn test_eutectic_and_solid() {
        let st = PhysicalParams::default().stefan_number;
        let phase = method().solve_cell(0, cell(-5.0, 0.0, 0.0)).unwrap();
        assert_eq!(phase.temperature, -1.0);
        assert!((phase.solid_fraction - 4.0 / st).abs() < 1e-14);

        let phase = method().solve_cell(0, cell(-6.0, 0.0, 0.0)).unwrap();
        assert_eq!(phase.solid_fraction, 1.0);
        assert!((phase.temperature - (-6.0 + st)).abs() < 1e-14);
    }

    #[test]
    fn test_super_saturated_gas_forms_bubbles() {
        let chi = PhysicalParams::default().expansion_coefficient;
        let phase = method().solve_cell(0, cell(0.1, 0.0, 2.0 * chi)).unwrap();
        assert!((phase.gas_fraction - chi).abs() < 1e-14);
        assert_eq!(phase.dissolved_gas, 1.0);
        let sum = phase.solid_fraction + phase.liquid_fraction + phase.gas_fraction;
        assert!((sum - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_sub_saturated_gas_dissolved() {
        let chi = PhysicalParams::default().expansion_coefficient;
        let phase = method().solve_cell(0, cell(0.1, 0.0, 0.5 * chi)).unwrap();
        assert_eq!(phase.gas_fraction, 0.0);
        assert!((phase.dissolved_gas - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_analytic_derivative_matches_finite_difference() {
        let method = method();
        for h in [0.2, -0.5, -2.0, -5.0, -7.0] {
            let prime = cell(h, 0.1, 0.0);
            let analytic = method.temperature_derivative(prime);
            let delta = 1e-6;
            let upper = method.solve_cell(0, cell(h + delta, 0.1, 0.0)).unwrap();
            let lower = method.solve_cell(0, cell(h - delta, 0.1, 0.0)).unwrap();
            let numeric = (upper.temperature - lower.temperature) / (2.0 * delta);
            assert!(
                (analytic - numeric).abs() < 1e-5,
                "dT/dH at H={}: analytic {} vs numeric {}",
                h,
                analytic,
                numeric
            );
        }
    }

    #[test]
    fn test_bubbles_capped_at_pore_space() {
        // Eutectic cell with little pore space and far more gas than fits
        let params = PhysicalParams::default();
        let h = -1.0 - 0.9 * params.stefan_number;
        let phase = method().solve_cell(0, cell(h, 0.0, 5.0)).unwrap();
        assert!((phase.solid_fraction - 0.9).abs() < 1e-12);
        assert!((phase.gas_fraction - 0.1).abs() < 1e-12);
        assert!(phase.liquid_fraction.abs() < 1e-12);
    }
}
