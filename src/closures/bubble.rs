//! Buoyant rise of gas bubbles through the pore network.
//!
//! A bubble of scaled radius Λ in a pore throat of scaled radius
//! `φl^q + reg` has size ratio `λ = Λ / (φl^q + reg)`. Its interstitial rise
//! velocity is Stokes rise `B · HR(μ*) · Λ²` reduced by a wall drag factor
//! K(λ), written on the pore scale as `B · HR · φl^{2q} · λ² · K(λ)`.
//! Bubbles that do not fit through the throat (λ ≥ 1) are trapped.
//!
//! For a power law size distribution the velocity and lag factor are
//! volume-weighted averages over radius, computed with Gauss-Legendre
//! quadrature on the part of the radius interval that fits the throat.

use crate::closures::permeability::percolation_factor;
use crate::config::{BubbleDistribution, BubbleParams, WallDragLaw};
use crate::polynomial::GaussLegendre;

/// Quadrature points for averaging over the bubble size distribution.
pub const SIZE_QUADRATURE_POINTS: usize = 16;

/// Wall drag enhancement factor K(λ), clamped to 1 for λ < 0 and 0 for λ > 1.
#[inline]
pub fn wall_drag(size_ratio: f64, law: WallDragLaw, drag_exponent: f64) -> f64 {
    if size_ratio < 0.0 {
        return 1.0;
    }
    if size_ratio > 1.0 {
        return 0.0;
    }
    let lam = size_ratio;
    match law {
        WallDragLaw::Power => (1.0 - lam).powf(drag_exponent),
        WallDragLaw::Haberman => {
            let lam5 = lam.powi(5);
            (1.0 - 1.5 * lam + 1.5 * lam5 - lam5 * lam) / (1.0 + 1.5 * lam5)
        }
    }
}

/// Ratio of a bubble's advection by the liquid to the liquid velocity,
/// `1 - λ/2` clamped to [0.5, 1].
#[inline]
pub fn lag_factor(size_ratio: f64) -> f64 {
    if size_ratio < 0.0 {
        1.0
    } else if size_ratio > 1.0 {
        0.5
    } else {
        1.0 - 0.5 * size_ratio
    }
}

/// Hadamard-Rybczynski drag correction `2(1+μ*)/(2+3μ*)`.
///
/// Equals one for free-slip bubbles (μ* = 0).
#[inline]
pub fn hadamard_rybczynski_factor(viscosity_ratio: f64) -> f64 {
    2.0 * (1.0 + viscosity_ratio) / (2.0 + 3.0 * viscosity_ratio)
}

/// Bubble rise closure built once from the configuration.
#[derive(Clone, Debug)]
pub struct BubbleModel {
    params: BubbleParams,
    viscosity_ratio: f64,
    regularisation: f64,
    quadrature: GaussLegendre,
}

impl BubbleModel {
    pub fn new(params: BubbleParams, viscosity_ratio: f64, regularisation: f64) -> Self {
        Self {
            params,
            viscosity_ratio,
            regularisation,
            quadrature: GaussLegendre::new(SIZE_QUADRATURE_POINTS),
        }
    }

    pub fn params(&self) -> &BubbleParams {
        &self.params
    }

    /// Scaled pore throat radius `φl^q + reg`.
    #[inline]
    pub fn throat_radius(&self, liquid_fraction: f64) -> f64 {
        liquid_fraction.max(0.0).powf(self.params.pore_throat_scaling) + self.regularisation
    }

    /// Size ratio λ of a bubble with scaled radius `radius`.
    #[inline]
    pub fn size_ratio(&self, radius: f64, liquid_fraction: f64) -> f64 {
        radius / self.throat_radius(liquid_fraction)
    }

    /// `φl^{2q} λ² K(λ)` for one bubble size.
    fn pore_scale_velocity(&self, radius: f64, liquid_fraction: f64) -> f64 {
        let lam = self.size_ratio(radius, liquid_fraction);
        let drag = wall_drag(lam, self.params.wall_drag_law, self.params.drag_exponent);
        liquid_fraction
            .max(0.0)
            .powf(2.0 * self.params.pore_throat_scaling)
            * lam
            * lam
            * drag
    }

    /// Interstitial gas rise velocity for liquid fraction `φl` on an edge.
    pub fn rise_velocity(&self, liquid_fraction: f64) -> f64 {
        let shape = match &self.params.distribution {
            BubbleDistribution::Mono(mono) => {
                self.pore_scale_velocity(mono.bubble_radius_scaled, liquid_fraction)
            }
            BubbleDistribution::PowerLaw(dist) => {
                let power = dist.bubble_distribution_power;
                let r_min = dist.minimum_bubble_radius_scaled;
                let r_max = dist.maximum_bubble_radius_scaled;
                let upper = r_max.min(self.throat_radius(liquid_fraction));
                if upper <= r_min {
                    0.0
                } else {
                    self.quadrature.integrate(r_min, upper, |r| {
                        self.pore_scale_velocity(r, liquid_fraction) * r.powf(3.0 - power)
                    }) / volume_moment(power, r_min, r_max)
                }
            }
        };

        let mut velocity =
            self.params.buoyancy * hadamard_rybczynski_factor(self.viscosity_ratio) * shape;
        if self.params.porosity_threshold {
            velocity *= percolation_factor(liquid_fraction, self.params.porosity_threshold_value);
        }
        velocity
    }

    /// Lag factor of the bubble population for liquid fraction `φl`.
    pub fn mean_lag(&self, liquid_fraction: f64) -> f64 {
        match &self.params.distribution {
            BubbleDistribution::Mono(mono) => {
                lag_factor(self.size_ratio(mono.bubble_radius_scaled, liquid_fraction))
            }
            BubbleDistribution::PowerLaw(dist) => {
                let power = dist.bubble_distribution_power;
                let r_min = dist.minimum_bubble_radius_scaled;
                let r_max = dist.maximum_bubble_radius_scaled;
                let throat = self.throat_radius(liquid_fraction);
                let upper = r_max.min(throat).max(r_min);

                // Bubbles larger than the throat have the saturated lag of one half
                let fitting = self.quadrature.integrate(r_min, upper, |r| {
                    lag_factor(self.size_ratio(r, liquid_fraction)) * r.powf(3.0 - power)
                });
                let trapped = 0.5 * volume_moment(power, upper, r_max);
                (fitting + trapped) / volume_moment(power, r_min, r_max)
            }
        }
    }
}

/// `∫_a^b R^{3-p} dR`, the bubble volume held between radii a and b.
fn volume_moment(power: f64, a: f64, b: f64) -> f64 {
    if b <= a {
        return 0.0;
    }
    let exponent = 4.0 - power;
    if exponent.abs() < 1e-12 {
        (b / a).ln()
    } else {
        (b.powf(exponent) - a.powf(exponent)) / exponent
    }
}
