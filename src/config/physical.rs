//! Non-dimensional physical parameters of the mushy layer.

use serde::{Deserialize, Serialize};

/// Non-dimensional numbers describing the mushy layer.
///
/// Defaults correspond to first-year sea ice growing from seawater with air
/// as the dissolved gas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalParams {
    /// Gas expansion coefficient χ = ρ_l ξ_sat / ρ_g.
    /// default: 0.029
    pub expansion_coefficient: f64,

    /// Concentration ratio C = S_i / (S_E - S_i).
    /// default: 0.17
    pub concentration_ratio: f64,

    /// Stefan number St = L / (c_p ΔT).
    /// default: 4.2
    pub stefan_number: f64,

    /// Lewis number for salt, infinite when salt does not diffuse.
    /// default: inf
    pub lewis_salt: f64,

    /// Lewis number for dissolved gas, infinite when gas does not diffuse.
    /// default: inf
    pub lewis_gas: f64,

    /// Velocity of the reference frame (positive upward).
    /// default: 0.0
    pub frame_velocity: f64,

    /// Maximum interstitial liquid velocity U0 of a prescribed Darcy flow.
    /// default: 0.0
    pub liquid_velocity: f64,

    /// Average the thermal conductivity over the solid and liquid phases.
    /// default: false
    pub phase_average_conductivity: bool,

    /// Ratio of solid to liquid thermal conductivity.
    /// default: 4.11
    pub conductivity_ratio: f64,

    /// Turbulent to molecular diffusivity ratio reached in fully liquid cells.
    /// default: 1.0 (no enhancement)
    pub eddy_diffusivity_ratio: f64,

    /// Apply the eddy diffusivity to dissolved gas as well as heat and salt.
    /// default: false
    pub eddy_diffuse_gas: bool,

    /// Ratio of gas (or oil) viscosity to liquid viscosity.
    /// Zero selects free-slip bubbles, otherwise Hadamard-Rybczynski drag.
    /// default: 0.0
    pub gas_viscosity_ratio: f64,

    /// Fraction of the saturation concentration the brine holds before
    /// exsolving gas.
    /// default: 1.0
    pub tolerable_super_saturation_fraction: f64,

    /// Damköhler number for bubble nucleation, used by the DISEQ model.
    /// default: 1.0
    pub damkohler_number: f64,
}

impl Default for PhysicalParams {
    fn default() -> Self {
        Self {
            expansion_coefficient: 0.029,
            concentration_ratio: 0.17,
            stefan_number: 4.2,
            lewis_salt: f64::INFINITY,
            lewis_gas: f64::INFINITY,
            frame_velocity: 0.0,
            liquid_velocity: 0.0,
            phase_average_conductivity: false,
            conductivity_ratio: 4.11,
            eddy_diffusivity_ratio: 1.0,
            eddy_diffuse_gas: false,
            gas_viscosity_ratio: 0.0,
            tolerable_super_saturation_fraction: 1.0,
            damkohler_number: 1.0,
        }
    }
}

impl PhysicalParams {
    /// Inverse Lewis number for salt (zero when salt does not diffuse).
    #[inline]
    pub fn salt_diffusivity(&self) -> f64 {
        inverse_or_zero(self.lewis_salt)
    }

    /// Inverse Lewis number for dissolved gas (zero when gas does not diffuse).
    #[inline]
    pub fn gas_diffusivity(&self) -> f64 {
        inverse_or_zero(self.lewis_gas)
    }
}

fn inverse_or_zero(lewis: f64) -> f64 {
    if lewis.is_infinite() { 0.0 } else { 1.0 / lewis }
}
