//! Column diagnostics of archived states.

use crate::enthalpy::{EnthalpyMethod, PhaseSolveError};
use crate::mesh::Grid;
use crate::solver::{Solution, State, StateFull};
use crate::source::{DrainageError, ice_ocean_boundary_depth};

/// Depth integrals `∫ q dz` of the prime variables over the column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnIntegrals {
    pub enthalpy: f64,
    pub salt: f64,
    /// Bulk gas (EQM) or bulk dissolved gas (DISEQ)
    pub gas: f64,
    /// Zero for EQM states
    pub gas_fraction: f64,
}

impl ColumnIntegrals {
    pub fn of(state: &State, grid: &Grid) -> Self {
        let step = grid.step();
        let integral = |values: &[f64]| values.iter().sum::<f64>() * step;
        Self {
            enthalpy: integral(&state.enthalpy),
            salt: integral(&state.salt),
            gas: integral(&state.gas),
            gas_fraction: integral(&state.gas_fraction),
        }
    }

    /// Total gas content, bulk dissolved plus free gas for DISEQ.
    pub fn total_gas(&self) -> f64 {
        self.gas + self.gas_fraction
    }

    /// Largest absolute change of any integral between two states.
    pub fn max_difference(&self, other: &ColumnIntegrals) -> f64 {
        [
            self.enthalpy - other.enthalpy,
            self.salt - other.salt,
            self.total_gas() - other.total_gas(),
        ]
        .into_iter()
        .fold(0.0_f64, |acc, d| acc.max(d.abs()))
    }
}

/// Depth of the ice-ocean interface, one when the ice fills the column.
pub fn ice_depth(solid_fraction: &[f64], grid: &Grid) -> f64 {
    match ice_ocean_boundary_depth(solid_fraction, grid.edges()) {
        Ok(depth) => depth,
        Err(DrainageError::IceReachedBottom) => 1.0,
    }
}

/// Diagnostics of one archived state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaveDiagnostics {
    pub time: f64,
    pub ice_depth: f64,
    /// Temperature of the top cell
    pub top_temperature: f64,
    /// Column-mean solid fraction
    pub mean_solid_fraction: f64,
    pub integrals: ColumnIntegrals,
}

/// Diagnostics for every save time of a solution.
pub fn summarise<M: EnthalpyMethod + ?Sized>(
    solution: &Solution,
    grid: &Grid,
    method: &M,
) -> Result<Vec<SaveDiagnostics>, PhaseSolveError> {
    (0..solution.n_times())
        .map(|k| {
            let state = solution.state(k);
            let integrals = ColumnIntegrals::of(&state, grid);
            let full = StateFull::from_state(state, method)?;
            let phase = &full.phase;
            let n = phase.len().max(1) as f64;
            Ok(SaveDiagnostics {
                time: solution.times[k],
                ice_depth: ice_depth(&phase.solid_fraction, grid),
                top_temperature: phase.temperature.last().copied().unwrap_or(f64::NAN),
                mean_solid_fraction: phase.solid_fraction.iter().sum::<f64>() / n,
                integrals,
            })
        })
        .collect()
}
