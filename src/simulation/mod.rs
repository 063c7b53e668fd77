//! Simulation runner abstraction.
//!
//! This module provides a high-level interface for running mushy layer
//! simulations that ties together:
//! - Initial conditions
//! - The physics module (RHS computation, stable timestep)
//! - Time integrators (forward Euler, linearised backward Euler, embedded RK)
//! - Stability monitoring and the solution archive
//!
//! # Example
//! ```no_run
//! use mushy_rs::config::Config;
//! use mushy_rs::simulation::Simulation;
//!
//! let cfg = Config::load("growth.yml").unwrap();
//! let result = Simulation::new(cfg).unwrap().verbose().run().unwrap();
//! println!("{} saves in {} steps", result.solution.n_times(), result.n_steps);
//! ```

mod batch;
mod error;
mod initial_conditions;
mod runner;

pub use batch::{RunOutcome, count_failures, run_batch, run_one};
pub use error::SimulationError;
pub use initial_conditions::{
    FIELD_STATION_ICE_DEPTH, FIELD_STATION_ICE_TEMPERATURE, FIELD_STATION_OCEAN_TEMPERATURE,
    ICE_LAYER_SALINITY, initial_state, mush_enthalpy,
};
pub use runner::{
    ADAPTIVE_MAX_STEP_FACTOR, RunStatus, Simulation, SimulationConfig, SimulationResult,
};
