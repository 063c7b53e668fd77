//! Turbulent enhancement of diffusion in the liquid below the ice.

/// Liquid fraction scale over which the enhancement decays into the mush.
pub const EDDY_RAMP_SCALE: f64 = 0.02;

/// Multiplier `1 + (R - 1) exp(-(1 - φl) / 0.02)` of the molecular diffusivity.
///
/// Equals R in fully liquid cells and decays to one inside the mush.
#[inline]
pub fn eddy_multiplier(liquid_fraction: f64, ratio: f64) -> f64 {
    1.0 + (ratio - 1.0) * (-(1.0 - liquid_fraction) / EDDY_RAMP_SCALE).exp()
}

/// Additive turbulent diffusivity `m(φl) - 1`.
#[inline]
pub fn eddy_diffusivity(liquid_fraction: f64, ratio: f64) -> f64 {
    eddy_multiplier(liquid_fraction, ratio) - 1.0
}
