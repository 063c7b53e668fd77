//! Edge velocities of the liquid, gas and reference frame.

use crate::closures::bubble::BubbleModel;
use crate::config::Config;
use crate::enthalpy::FRACTION_TOLERANCE;
use crate::mesh::geometric;
use crate::solver::StateBCs;

/// Velocities on the I+1 cell edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeVelocities {
    /// Interstitial gas velocity Vg
    pub gas: Vec<f64>,
    /// Darcy liquid velocity Wl
    pub liquid: Vec<f64>,
    /// Frame velocity V
    pub frame: Vec<f64>,
}

impl EdgeVelocities {
    /// Largest advective speed over all edges.
    pub fn max_speed(&self) -> f64 {
        self.gas
            .iter()
            .chain(&self.liquid)
            .chain(&self.frame)
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// Velocity closures of one run.
#[derive(Clone, Debug)]
pub struct VelocityClosure {
    bubble: BubbleModel,
    liquid_velocity: f64,
    frame_velocity: f64,
    couple_to_vertical_flow: bool,
    regularisation: f64,
}

impl VelocityClosure {
    pub fn new(
        bubble: BubbleModel,
        liquid_velocity: f64,
        frame_velocity: f64,
        couple_to_vertical_flow: bool,
        regularisation: f64,
    ) -> Self {
        Self {
            bubble,
            liquid_velocity,
            frame_velocity,
            couple_to_vertical_flow,
            regularisation,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let regularisation = cfg.numerical_params.regularisation;
        let couple = cfg
            .brine_convection
            .rjw14()
            .is_some_and(|p| p.couple_bubble_to_vertical_flow);
        Self::new(
            BubbleModel::new(
                cfg.bubble_params.clone(),
                cfg.physical_params.gas_viscosity_ratio,
                regularisation,
            ),
            cfg.physical_params.liquid_velocity,
            cfg.physical_params.frame_velocity,
            couple,
            regularisation,
        )
    }

    pub fn bubble(&self) -> &BubbleModel {
        &self.bubble
    }

    /// Evaluate all edge velocities.
    ///
    /// `brine_velocity` is the upward Darcy velocity of convecting brine on
    /// edges, when brine convection is active.
    pub fn compute(&self, bcs: &StateBCs, brine_velocity: Option<&[f64]>) -> EdgeVelocities {
        let edge_liquid = geometric(&bcs.liquid_fraction);
        let n_edges = edge_liquid.len();

        let mut liquid: Vec<f64> = edge_liquid
            .iter()
            .map(|&phi| phi * self.liquid_velocity / 2.0)
            .collect();
        if let Some(brine) = brine_velocity {
            for (w, b) in liquid.iter_mut().zip(brine) {
                *w += b;
            }
        }

        let mut gas: Vec<f64> = edge_liquid
            .iter()
            .map(|&phi| self.bubble.rise_velocity(phi))
            .collect();

        if self.couple_to_vertical_flow {
            for ((vg, &phi), &wl) in gas.iter_mut().zip(&edge_liquid).zip(&liquid) {
                *vg += 2.0 * self.bubble.mean_lag(phi) * wl / (phi + self.regularisation);
            }
        }

        // Gas cannot rise into a cell with no pore space left. The top edge
        // leads out of the column and is left alone.
        for (edge, vg) in gas.iter_mut().enumerate().take(n_edges - 1) {
            let above = edge + 1;
            if bcs.gas_fraction[above] + bcs.solid_fraction[above] >= 1.0 - FRACTION_TOLERANCE {
                *vg = 0.0;
            }
        }

        EdgeVelocities {
            gas,
            liquid,
            frame: vec![self.frame_velocity; n_edges],
        }
    }
}
