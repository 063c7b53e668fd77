//! Parameters for gas bubble transport through the pore network.

use serde::{Deserialize, Serialize};

/// Empirical fit for the drag enhancement on a bubble in a pore throat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallDragLaw {
    /// `(1 - λ)^n`
    #[default]
    Power,
    /// Haberman & Sayre rational fit
    Haberman,
}

/// Population of identical spherical bubbles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonoBubbleParams {
    /// Bubble radius divided by the pore throat scale Λ = R_B / R_0.
    /// default: 1.0
    pub bubble_radius_scaled: f64,
}

impl Default for MonoBubbleParams {
    fn default() -> Self {
        Self {
            bubble_radius_scaled: 1.0,
        }
    }
}

/// Bubbles with number density ∝ R^{-p} between a minimum and maximum radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerLawBubbleParams {
    /// Power p of the size distribution.
    /// default: 1.5
    pub bubble_distribution_power: f64,
    /// Smallest bubble radius divided by the pore throat scale.
    /// default: 1e-3
    pub minimum_bubble_radius_scaled: f64,
    /// Largest bubble radius divided by the pore throat scale.
    /// default: 1.0
    pub maximum_bubble_radius_scaled: f64,
}

impl Default for PowerLawBubbleParams {
    fn default() -> Self {
        Self {
            bubble_distribution_power: 1.5,
            minimum_bubble_radius_scaled: 1e-3,
            maximum_bubble_radius_scaled: 1.0,
        }
    }
}

/// Bubble size distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BubbleDistribution {
    Mono(MonoBubbleParams),
    PowerLaw(PowerLawBubbleParams),
}

impl Default for BubbleDistribution {
    fn default() -> Self {
        BubbleDistribution::Mono(MonoBubbleParams::default())
    }
}

/// Parameters for the gas interstitial velocity closure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleParams {
    /// Buoyancy number B = ρ_l g R_0² H / (3 μ κ).
    /// default: 100.0
    #[serde(rename = "B")]
    pub buoyancy: f64,

    /// Exponent q relating pore throat radius to liquid fraction.
    /// default: 0.5
    pub pore_throat_scaling: f64,

    /// Exponent of the power law wall drag fit.
    /// default: 6.0
    pub drag_exponent: f64,

    /// Wall drag fit.
    /// default: power
    pub wall_drag_law: WallDragLaw,

    /// Block gas transport below a percolation threshold.
    /// default: false
    pub porosity_threshold: bool,

    /// Critical liquid fraction of the percolation threshold.
    /// default: 0.024
    pub porosity_threshold_value: f64,

    /// Bubble size distribution.
    /// default: mono with Λ = 1
    pub distribution: BubbleDistribution,
}

impl Default for BubbleParams {
    fn default() -> Self {
        Self {
            buoyancy: 100.0,
            pore_throat_scaling: 0.5,
            drag_exponent: 6.0,
            wall_drag_law: WallDragLaw::Power,
            porosity_threshold: false,
            porosity_threshold_value: 0.024,
            distribution: BubbleDistribution::default(),
        }
    }
}

impl BubbleParams {
    /// Single bubble size with the given scaled radius.
    pub fn mono(bubble_radius_scaled: f64) -> Self {
        Self {
            distribution: BubbleDistribution::Mono(MonoBubbleParams {
                bubble_radius_scaled,
            }),
            ..Default::default()
        }
    }

    /// Power law size distribution.
    pub fn power_law(power: f64, minimum: f64, maximum: f64) -> Self {
        Self {
            distribution: BubbleDistribution::PowerLaw(PowerLawBubbleParams {
                bubble_distribution_power: power,
                minimum_bubble_radius_scaled: minimum,
                maximum_bubble_radius_scaled: maximum,
            }),
            ..Default::default()
        }
    }

    /// Enable the percolation threshold at the given liquid fraction.
    pub fn with_porosity_threshold(mut self, value: f64) -> Self {
        self.porosity_threshold = true;
        self.porosity_threshold_value = value;
        self
    }

    /// Select the wall drag fit.
    pub fn with_wall_drag_law(mut self, law: WallDragLaw) -> Self {
        self.wall_drag_law = law;
        self
    }
}
