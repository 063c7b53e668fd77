//! Prime variables together with the phase state they imply.

use crate::enthalpy::{EnthalpyMethod, PhaseProfile, PhaseSolveError};
use crate::solver::state::State;

/// State extended with phase fractions, temperature, brine salinity and
/// dissolved gas on cell centers.
#[derive(Clone, Debug, PartialEq)]
pub struct StateFull {
    pub state: State,
    pub phase: PhaseProfile,
}

impl StateFull {
    pub fn new(state: State, phase: PhaseProfile) -> Self {
        assert_eq!(state.n_cells(), phase.len(), "Phase profile length mismatch");
        Self { state, phase }
    }

    /// Run the enthalpy method on `state`.
    pub fn from_state<M: EnthalpyMethod + ?Sized>(
        state: State,
        method: &M,
    ) -> Result<Self, PhaseSolveError> {
        let phase = method.solve(&state)?;
        Ok(Self { state, phase })
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.state.time
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.state.n_cells()
    }

    /// Named derived fields on cell centers.
    pub fn phase_fields(&self) -> [(&'static str, &[f64]); 6] {
        [
            ("solid_fraction", self.phase.solid_fraction.as_slice()),
            ("liquid_fraction", self.phase.liquid_fraction.as_slice()),
            ("gas_fraction", self.phase.gas_fraction.as_slice()),
            ("temperature", self.phase.temperature.as_slice()),
            ("liquid_salinity", self.phase.liquid_salinity.as_slice()),
            ("dissolved_gas", self.phase.dissolved_gas.as_slice()),
        ]
    }
}
