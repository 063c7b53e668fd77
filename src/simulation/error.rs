//! Errors that end a run.

use thiserror::Error;

use crate::boundary::ForcingSetupError;
use crate::config::ConfigError;
use crate::enthalpy::PhaseSolveError;
use crate::io::ForcingLookupError;
use crate::physics::RhsError;
use crate::solver::State;
use crate::source::DrainageError;
use crate::time::StepError;

/// Failure of a single run. Every variant is fatal for that run only.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Forcing setup failed: {0}")]
    ForcingSetup(#[from] ForcingSetupError),

    #[error(transparent)]
    PhaseSolve(#[from] PhaseSolveError),

    #[error(transparent)]
    ForcingLookup(#[from] ForcingLookupError),

    #[error(transparent)]
    Drainage(#[from] DrainageError),

    /// The integrator failed to converge or the implicit solve broke down.
    /// `snapshot` is the last accepted state.
    #[error("Integrator diverged at t = {time}: {reason}")]
    IntegratorDivergence {
        time: f64,
        reason: String,
        snapshot: Box<State>,
    },

    #[error("Non-finite {field} in cell {cell} at t = {time}")]
    NonFinite {
        time: f64,
        field: &'static str,
        cell: usize,
    },

    #[error("Step limit of {0} reached")]
    StepLimit(usize),
}

impl From<RhsError> for SimulationError {
    fn from(err: RhsError) -> Self {
        match err {
            RhsError::PhaseSolve(e) => SimulationError::PhaseSolve(e),
            RhsError::ForcingLookup(e) => SimulationError::ForcingLookup(e),
            RhsError::Drainage(e) => SimulationError::Drainage(e),
        }
    }
}

impl SimulationError {
    /// Convert a failed step taken from `snapshot`.
    pub fn from_step(err: StepError<RhsError>, snapshot: &State) -> Self {
        match err {
            StepError::Rhs(e) => e.into(),
            StepError::Divergence { time, reason } => SimulationError::IntegratorDivergence {
                time,
                reason,
                snapshot: Box::new(snapshot.clone()),
            },
        }
    }

    /// Non-finite check of a freshly computed state.
    pub fn check_finite(state: &State) -> Result<(), Self> {
        match state.first_non_finite() {
            Some((field, cell)) => Err(SimulationError::NonFinite {
                time: state.time,
                field,
                cell,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divergence_keeps_snapshot() {
        let state = State::eqm(0.25, vec![1.0], vec![0.0], vec![0.0]);
        let err = SimulationError::from_step(StepError::divergence(0.25, "singular pivot"), &state);
        match err {
            SimulationError::IntegratorDivergence { time, snapshot, .. } => {
                assert_eq!(time, 0.25);
                assert_eq!(*snapshot, state);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_located() {
        let mut state = State::eqm(1.0, vec![1.0, 2.0], vec![0.0; 2], vec![0.0; 2]);
        assert!(SimulationError::check_finite(&state).is_ok());
        state.gas[1] = f64::INFINITY;
        let err = SimulationError::check_finite(&state).unwrap_err();
        assert_eq!(err.to_string(), "Non-finite gas in cell 1 at t = 1");
    }
}
