//! Surface temperature from a radiative and turbulent energy balance.
//!
//! The surface temperature T_s (°C) balances, per unit area,
//!
//! ```text
//! ε F_LW - ε σ (T_s + 273.15)⁴ + h_s (T_air - T_s) + (1 - α)(1 - i₀) F_SW
//!     + k_l k (T_1 - T_s) / (L step / 2) = 0
//! ```
//!
//! with T_1 the temperature of the top cell, whose center lies half a cell
//! below the surface. The residual decreases strictly in T_s, so Newton
//! iteration from T_1 converges to the unique root. The surface cannot warm
//! above the melting point, so the root is capped at 0 °C.

use crate::config::{RadiativeForcing, Scales};

/// Longwave emissivity of the surface.
pub const EMISSIVITY: f64 = 0.99;
/// Stefan-Boltzmann constant (W/m²/K⁴).
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;
/// Bulk sensible heat transfer coefficient (W/m²/K).
pub const SENSIBLE_HEAT_COEFFICIENT: f64 = 8.3;
/// Offset between °C and K.
pub const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

const MAX_ITERATIONS: usize = 50;
const TOLERANCE: f64 = 1e-10;

/// Energy balance at the top of the column.
#[derive(Clone, Debug)]
pub struct SurfaceEnergyBalance {
    /// Downwelling longwave (W/m²)
    pub longwave: f64,
    /// Downwelling shortwave (W/m²)
    pub shortwave: f64,
    pub albedo: f64,
    /// Fraction of net shortwave transmitted below the surface layer
    pub penetration_fraction: f64,
    /// Air temperature (°C)
    pub air_temperature: f64,
    scales: Scales,
}

impl SurfaceEnergyBalance {
    pub fn new(cfg: &RadiativeForcing, scales: Scales) -> Self {
        Self {
            longwave: cfg.constant_lw_irradiance,
            shortwave: cfg.constant_sw_irradiance,
            albedo: cfg.sw_albedo,
            penetration_fraction: cfg.sw_penetration_fraction,
            air_temperature: scales.convert_to_dimensional_temperature(cfg.constant_top_temperature),
            scales,
        }
    }

    /// Net flux into the surface (W/m²) at surface temperature `t_s` (°C).
    ///
    /// `conductance` is `k_l k / (L step / 2)` in W/m²/K.
    pub fn residual(&self, t_s: f64, top_cell_temperature: f64, conductance: f64) -> f64 {
        let kelvin = t_s + ZERO_CELSIUS_IN_KELVIN;
        EMISSIVITY * self.longwave - EMISSIVITY * STEFAN_BOLTZMANN * kelvin.powi(4)
            + SENSIBLE_HEAT_COEFFICIENT * (self.air_temperature - t_s)
            + (1.0 - self.albedo) * (1.0 - self.penetration_fraction) * self.shortwave
            + conductance * (top_cell_temperature - t_s)
    }

    fn residual_derivative(&self, t_s: f64, conductance: f64) -> f64 {
        let kelvin = t_s + ZERO_CELSIUS_IN_KELVIN;
        -4.0 * EMISSIVITY * STEFAN_BOLTZMANN * kelvin.powi(3) - SENSIBLE_HEAT_COEFFICIENT - conductance
    }

    /// Non-dimensional surface temperature.
    ///
    /// `top_cell_temperature` is non-dimensional, `conductivity` the relative
    /// conductivity of the top cell and `step` the non-dimensional cell width.
    pub fn surface_temperature(&self, top_cell_temperature: f64, conductivity: f64, step: f64) -> f64 {
        let t_cell = self.scales.convert_to_dimensional_temperature(top_cell_temperature);
        let conductance = self.scales.liquid_thermal_conductivity * conductivity
            / (0.5 * step * self.scales.lengthscale);

        let mut t_s = t_cell;
        for _ in 0..MAX_ITERATIONS {
            let update =
                self.residual(t_s, t_cell, conductance) / self.residual_derivative(t_s, conductance);
            t_s -= update;
            if update.abs() < TOLERANCE {
                break;
            }
        }

        self.scales
            .convert_from_dimensional_temperature(t_s.min(0.0))
    }
}
