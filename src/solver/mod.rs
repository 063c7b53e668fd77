//! Solver state and solution containers.
//!
//! # Submodules
//!
//! - [`state`]: prime state, state with phase fields, ghost-padded state
//! - [`core`]: solution archive of a run

pub mod core;
pub mod state;

pub use core::{FieldTable, Solution, SolutionRecorder};
pub use state::{GhostCell, PrimeCell, State, StateBCs, StateFull};
