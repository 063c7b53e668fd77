//! Brine channel convection after Rees Jones & Worster (2014).
//!
//! Gravitationally unstable brine in the mushy layer drains through
//! channels. The column model represents the drainage by an upward Darcy
//! flow of ocean water entering the ice base and a distributed sink that
//! removes brine sideways into the channels over the convecting region.
//!
//! The local Rayleigh number at height z inside the ice is
//!
//! ```text
//! Ra(z) = Ra_S (h + z) K(z) Θl(z)
//! ```
//!
//! with h the ice depth and K the harmonic mean permeability between the
//! ice base and z. Permeability is taken on the porosity `1 - φs`, so
//! bubbles in the pore space neither block the channels nor count as ice. The convecting region extends from the ice base to the
//! top edge of the highest cell with `Ra ≥ Ra_c`, and the strength of the
//! flow is set by the effective Rayleigh number `max(Ra - Ra_c)`.

use thiserror::Error;

use crate::closures::{BubbleModel, permeability};
use crate::config::{PhysicalParams, Rjw14Params};
use crate::mesh::Grid;
use crate::solver::State;

use super::traits::{SourceContext, SourceTerm};

/// Failure of the drainage parameterisation.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum DrainageError {
    #[error("Ice ocean interface has reached the bottom of the domain")]
    IceReachedBottom,
}

/// Positive depth of the ice-ocean interface.
///
/// The interface is the lower edge of the first cell from the bottom
/// holding any solid. A column without solid has zero ice depth.
pub fn ice_ocean_boundary_depth(
    solid_fraction: &[f64],
    edges: &[f64],
) -> Result<f64, DrainageError> {
    let index = solid_fraction
        .iter()
        .position(|&phi| phi > 0.0)
        .unwrap_or(solid_fraction.len());
    if index == 0 {
        return Err(DrainageError::IceReachedBottom);
    }
    Ok(-edges[index])
}

/// Harmonic mean permeability of the ice between its base and height `z`.
///
/// Cells whose centers lie in `(-h, z]` contribute. Any impermeable cell
/// makes the mean vanish.
pub fn integrated_mean_permeability(
    z: f64,
    porosity: &[f64],
    ice_depth: f64,
    grid: &Grid,
    threshold: Option<f64>,
) -> f64 {
    if z < -ice_depth {
        return 0.0;
    }
    let step = grid.step();
    let mut resistance = 0.0;
    let mut count = 0usize;
    for (&center, &phi) in grid.centers().iter().zip(porosity) {
        if center > -ice_depth && center <= z {
            let pi = permeability(phi, threshold);
            if pi <= 0.0 {
                return 0.0;
            }
            resistance += 1.0 / pi;
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    (ice_depth + z + step / 2.0) / (resistance * step)
}

/// Local Rayleigh number on cell centers.
pub fn rayleigh_numbers(
    grid: &Grid,
    porosity: &[f64],
    liquid_salinity: &[f64],
    ice_depth: f64,
    rayleigh_salt: f64,
    threshold: Option<f64>,
) -> Vec<f64> {
    grid.centers()
        .iter()
        .zip(liquid_salinity)
        .map(|(&z, &salinity)| {
            let k = integrated_mean_permeability(z, porosity, ice_depth, grid, threshold);
            rayleigh_salt * (ice_depth + z) * k * salinity
        })
        .collect()
}

/// Top of the convecting region: the upper edge of the highest cell with
/// `Ra ≥ Ra_c`, or `None` when the layer is stable everywhere.
pub fn convecting_region_height(rayleigh: &[f64], edges: &[f64], critical: f64) -> Option<f64> {
    rayleigh
        .iter()
        .rposition(|&ra| ra >= critical)
        .map(|k| edges[k + 1])
}

/// `max(Ra - Ra_c)` over supercritical cells, zero if there are none.
pub fn effective_rayleigh_number(rayleigh: &[f64], critical: f64) -> f64 {
    rayleigh
        .iter()
        .filter(|&&ra| ra >= critical)
        .map(|&ra| ra - critical)
        .fold(0.0, f64::max)
}

/// Drainage flow of the current state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrineChannelFlow {
    pub ice_depth: f64,
    /// Height of the top of the convecting region, if any
    pub convecting_top: Option<f64>,
    pub effective_rayleigh: f64,
    /// Upward brine flux W0 through the ice base
    pub brine_flux: f64,
    /// Upward Darcy velocity on edges
    pub edge_velocity: Vec<f64>,
    /// Rate of sideways brine removal on cell centers
    pub sink: Vec<f64>,
}

impl BrineChannelFlow {
    /// No drainage.
    pub fn stagnant(grid: &Grid, ice_depth: f64) -> Self {
        Self {
            ice_depth,
            convecting_top: None,
            effective_rayleigh: 0.0,
            brine_flux: 0.0,
            edge_velocity: vec![0.0; grid.n_edges()],
            sink: vec![0.0; grid.n_cells()],
        }
    }

    /// Evaluate the drainage flow from the phase state on cell centers.
    pub fn compute(
        grid: &Grid,
        solid_fraction: &[f64],
        liquid_salinity: &[f64],
        params: &Rjw14Params,
        threshold: Option<f64>,
    ) -> Result<Self, DrainageError> {
        let ice_depth = ice_ocean_boundary_depth(solid_fraction, grid.edges())?;
        if ice_depth <= 0.0 {
            return Ok(Self::stagnant(grid, ice_depth));
        }

        let porosity: Vec<f64> = solid_fraction.iter().map(|phi| 1.0 - phi).collect();
        let rayleigh = rayleigh_numbers(
            grid,
            &porosity,
            liquid_salinity,
            ice_depth,
            params.rayleigh_salt,
            threshold,
        );
        let effective_rayleigh = effective_rayleigh_number(&rayleigh, params.rayleigh_critical);
        let Some(top) = convecting_region_height(&rayleigh, grid.edges(), params.rayleigh_critical)
        else {
            return Ok(Self::stagnant(grid, ice_depth));
        };

        let brine_flux = params.convection_strength * effective_rayleigh / ice_depth;
        let region = ice_depth + top;

        let edge_velocity = grid
            .edges()
            .iter()
            .map(|&z| {
                if z <= -ice_depth {
                    brine_flux
                } else if z < top {
                    brine_flux * (top - z) / region
                } else {
                    0.0
                }
            })
            .collect();
        let sink = grid
            .centers()
            .iter()
            .map(|&z| {
                if z > -ice_depth && z < top {
                    brine_flux / region
                } else {
                    0.0
                }
            })
            .collect();

        Ok(Self {
            ice_depth,
            convecting_top: Some(top),
            effective_rayleigh,
            brine_flux,
            edge_velocity,
            sink,
        })
    }

    pub fn is_active(&self) -> bool {
        self.brine_flux > 0.0
    }
}

/// Heat, salt and gas carried out of the column by draining brine.
#[derive(Clone, Debug)]
pub struct BrineChannelSink {
    expansion_coefficient: f64,
    concentration_ratio: f64,
    couple_bubble_to_horizontal_flow: bool,
    bubble: BubbleModel,
}

impl BrineChannelSink {
    pub fn new(params: &PhysicalParams, convection: &Rjw14Params, bubble: BubbleModel) -> Self {
        Self {
            expansion_coefficient: params.expansion_coefficient,
            concentration_ratio: params.concentration_ratio,
            couple_bubble_to_horizontal_flow: convection.couple_bubble_to_horizontal_flow,
            bubble,
        }
    }

    /// Bubbles swept into the channels with the brine, `2 φg lag / φl`.
    ///
    /// The lag is averaged geometrically with the cell above; the top cell
    /// uses its own value.
    fn bubble_term(&self, liquid_fraction: &[f64], gas_fraction: &[f64]) -> Vec<f64> {
        let lag: Vec<f64> = liquid_fraction
            .iter()
            .map(|&phi| self.bubble.mean_lag(phi))
            .collect();
        let n = lag.len();
        (0..n)
            .map(|i| {
                let above = lag[(i + 1).min(n - 1)];
                let phi = liquid_fraction[i];
                if phi > 0.0 {
                    2.0 * gas_fraction[i] * (lag[i] * above).sqrt() / phi
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl SourceTerm for BrineChannelSink {
    fn evaluate(&self, ctx: &SourceContext<'_>) -> State {
        let mut out = ctx.full.state.zeros_with_shape();
        let Some(flow) = ctx.brine_flow.filter(|flow| flow.is_active()) else {
            return out;
        };
        let phase = &ctx.full.phase;
        let chi = self.expansion_coefficient;

        let bubbles = if self.couple_bubble_to_horizontal_flow && out.gas_fraction.is_empty() {
            Some(self.bubble_term(&phase.liquid_fraction, &phase.gas_fraction))
        } else {
            None
        };

        for (i, &sink) in flow.sink.iter().enumerate() {
            if sink == 0.0 {
                continue;
            }
            out.enthalpy[i] = -sink * phase.temperature[i];
            out.salt[i] = -sink * (phase.liquid_salinity[i] + self.concentration_ratio);
            let bubble = bubbles.as_ref().map_or(0.0, |b| b[i]);
            out.gas[i] = -sink * (chi * phase.dissolved_gas[i] + bubble);
        }
        out
    }

    fn name(&self) -> &'static str {
        "brine_channel_sink"
    }
}
