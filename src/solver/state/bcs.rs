//! Full state padded with boundary ghost cells.
//!
//! Every field has length I+2: index 0 is the ocean ghost cell, indices
//! 1..=I the interior and I+1 the surface ghost cell.

use crate::solver::state::StateFull;

/// Values of every field in one ghost cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GhostCell {
    pub enthalpy: f64,
    pub salt: f64,
    /// Bulk gas G (EQM) or bulk dissolved gas D (DISEQ)
    pub gas: f64,
    pub temperature: f64,
    pub liquid_salinity: f64,
    pub dissolved_gas: f64,
    pub solid_fraction: f64,
    pub liquid_fraction: f64,
    pub gas_fraction: f64,
}

impl GhostCell {
    /// Copy of interior cell `i`, used for extrapolated boundaries.
    pub fn from_interior(full: &StateFull, i: usize) -> Self {
        Self {
            enthalpy: full.state.enthalpy[i],
            salt: full.state.salt[i],
            gas: full.state.gas[i],
            temperature: full.phase.temperature[i],
            liquid_salinity: full.phase.liquid_salinity[i],
            dissolved_gas: full.phase.dissolved_gas[i],
            solid_fraction: full.phase.solid_fraction[i],
            liquid_fraction: full.phase.liquid_fraction[i],
            gas_fraction: full.phase.gas_fraction[i],
        }
    }
}

/// Ghost-padded fields of a [`StateFull`].
#[derive(Clone, Debug, PartialEq)]
pub struct StateBCs {
    pub time: f64,
    pub enthalpy: Vec<f64>,
    pub salt: Vec<f64>,
    pub gas: Vec<f64>,
    pub temperature: Vec<f64>,
    pub liquid_salinity: Vec<f64>,
    pub dissolved_gas: Vec<f64>,
    pub solid_fraction: Vec<f64>,
    pub liquid_fraction: Vec<f64>,
    pub gas_fraction: Vec<f64>,
}

fn pad(bottom: f64, interior: &[f64], top: f64) -> Vec<f64> {
    let mut padded = Vec::with_capacity(interior.len() + 2);
    padded.push(bottom);
    padded.extend_from_slice(interior);
    padded.push(top);
    padded
}

impl StateBCs {
    pub fn new(full: &StateFull, bottom: GhostCell, top: GhostCell) -> Self {
        let state = &full.state;
        let phase = &full.phase;
        Self {
            time: full.time(),
            enthalpy: pad(bottom.enthalpy, &state.enthalpy, top.enthalpy),
            salt: pad(bottom.salt, &state.salt, top.salt),
            gas: pad(bottom.gas, &state.gas, top.gas),
            temperature: pad(bottom.temperature, &phase.temperature, top.temperature),
            liquid_salinity: pad(
                bottom.liquid_salinity,
                &phase.liquid_salinity,
                top.liquid_salinity,
            ),
            dissolved_gas: pad(bottom.dissolved_gas, &phase.dissolved_gas, top.dissolved_gas),
            solid_fraction: pad(bottom.solid_fraction, &phase.solid_fraction, top.solid_fraction),
            liquid_fraction: pad(
                bottom.liquid_fraction,
                &phase.liquid_fraction,
                top.liquid_fraction,
            ),
            gas_fraction: pad(bottom.gas_fraction, &phase.gas_fraction, top.gas_fraction),
        }
    }

    /// Number of interior cells.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.enthalpy.len() - 2
    }

    /// Interior part of a ghost-padded field.
    #[inline]
    pub fn interior(values: &[f64]) -> &[f64] {
        &values[1..values.len() - 1]
    }
}
