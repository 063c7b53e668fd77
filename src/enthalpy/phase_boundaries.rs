//! Phase boundaries in enthalpy-salinity(-gas) space.
//!
//! Enthalpy decreases through four regions as the material cools:
//!
//! ```text
//!   liquid  >= liquidus  >  mush  >= eutectic  >  eutectic solid  >= solidus  >  solid
//! ```
//!
//! The reduced boundaries ignore the gas phase. The gas dependent boundaries
//! shift once bubbles take up pore space (bulk gas above the saturation
//! value of the liquid left at that point).

use crate::config::PhysicalParams;

/// Thermodynamic region of a cell, ignoring the gas state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRegion {
    Liquid,
    Mush,
    Eutectic,
    Solid,
}

/// Region together with whether the liquid is saturated with gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRegime {
    pub region: PhaseRegion,
    /// Bulk gas exceeds what the liquid can hold in solution.
    pub super_saturated: bool,
}

// =============================================================================
// Gas free boundaries
// =============================================================================

/// Liquidus enthalpy `-S`.
#[inline]
pub fn reduced_liquidus(salt: f64) -> f64 {
    -salt
}

/// Eutectic enthalpy `St (S - 1) / (1 + C) - 1`.
#[inline]
pub fn reduced_eutectic(salt: f64, params: &PhysicalParams) -> f64 {
    params.stefan_number * (salt - 1.0) / (1.0 + params.concentration_ratio) - 1.0
}

/// Solidus enthalpy `-1 - St`.
#[inline]
pub fn reduced_solidus(params: &PhysicalParams) -> f64 {
    -1.0 - params.stefan_number
}

/// Region from the gas free boundaries.
pub fn reduced_region(enthalpy: f64, salt: f64, params: &PhysicalParams) -> PhaseRegion {
    classify(
        enthalpy,
        reduced_liquidus(salt),
        reduced_eutectic(salt, params),
        reduced_solidus(params),
    )
}

fn classify(enthalpy: f64, liquidus: f64, eutectic: f64, solidus: f64) -> PhaseRegion {
    if enthalpy >= liquidus {
        PhaseRegion::Liquid
    } else if enthalpy >= eutectic {
        PhaseRegion::Mush
    } else if enthalpy >= solidus {
        PhaseRegion::Eutectic
    } else {
        PhaseRegion::Solid
    }
}

// =============================================================================
// Gas dependent boundaries
// =============================================================================

/// Liquidus shifted by the gas volume once the liquid is saturated.
pub fn liquidus(salt: f64, gas: f64, params: &PhysicalParams) -> f64 {
    let chi = params.expansion_coefficient;
    if gas <= chi {
        -salt
    } else {
        -(salt + params.concentration_ratio * (gas - chi) / (1.0 - chi))
    }
}

/// Liquid fraction at the eutectic temperature, `(S + C) / (1 + C)`.
#[inline]
pub fn eutectic_liquid_fraction(salt: f64, params: &PhysicalParams) -> f64 {
    (salt + params.concentration_ratio) / (1.0 + params.concentration_ratio)
}

pub fn eutectic(salt: f64, gas: f64, params: &PhysicalParams) -> f64 {
    let chi = params.expansion_coefficient;
    let st = params.stefan_number;
    let phi_e = eutectic_liquid_fraction(salt, params);
    if gas <= chi * phi_e {
        -1.0 - st * (1.0 - phi_e)
    } else {
        -(1.0 - gas + chi * phi_e) - (1.0 - gas + phi_e * (chi - 1.0)) * st
    }
}

pub fn solidus(gas: f64, params: &PhysicalParams) -> f64 {
    let st = params.stefan_number;
    if gas <= 0.0 {
        -1.0 - st
    } else {
        (1.0 - gas) * (-1.0 - st)
    }
}

/// Mush temperature of the gas free system, the smaller root of
/// `T² - (H + C + St) T + (C H - St S) = 0`.
///
/// Returns `None` if the discriminant is negative.
pub fn gas_free_mush_temperature(enthalpy: f64, salt: f64, params: &PhysicalParams) -> Option<f64> {
    let b = enthalpy + params.concentration_ratio + params.stefan_number;
    let a = params.concentration_ratio * enthalpy - params.stefan_number * salt;
    let discriminant = b * b - 4.0 * a;
    (discriminant >= 0.0).then(|| 0.5 * (b - discriminant.sqrt()))
}

/// Bulk gas the liquid can hold in solution, `χ φl` with φl from the gas free
/// solve.
pub fn saturation(enthalpy: f64, salt: f64, params: &PhysicalParams) -> Option<f64> {
    let chi = params.expansion_coefficient;
    let st = params.stefan_number;
    let value = match reduced_region(enthalpy, salt, params) {
        PhaseRegion::Liquid => chi,
        PhaseRegion::Mush => {
            let temperature = gas_free_mush_temperature(enthalpy, salt, params)?;
            chi * (1.0 - (temperature - enthalpy) / st)
        }
        PhaseRegion::Eutectic => chi * (1.0 + (enthalpy + 1.0) / st),
        PhaseRegion::Solid => 0.0,
    };
    Some(value)
}

/// Regime of the gas coupled system.
pub fn regime(enthalpy: f64, salt: f64, gas: f64, params: &PhysicalParams) -> Option<PhaseRegime> {
    let region = classify(
        enthalpy,
        liquidus(salt, gas, params),
        eutectic(salt, gas, params),
        solidus(gas, params),
    );
    let saturation = saturation(enthalpy, salt, params)?;
    Some(PhaseRegime {
        region,
        super_saturated: gas > saturation,
    })
}
