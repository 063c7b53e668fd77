//! # mushy-rs
//!
//! A phase-resolving finite-volume model of a one-dimensional mushy layer,
//! tracking heat, salt and gas through growing and melting sea ice.
//!
//! This crate provides the building blocks of the model:
//! - Non-dimensional configuration and its dimensional front end (YAML)
//! - Enthalpy methods (reduced, full, disequilibrium phase solves)
//! - Cell-centred grid with ghost-cell boundary conditions
//! - Constitutive closures (permeability, conductivity, bubble lag and drag)
//! - Upwind transport fluxes and source terms (brine drainage, nucleation,
//!   shortwave heating)
//! - Time integration (forward Euler, linearised backward Euler, adaptive RK)
//! - Simulation runner, batch execution and solution archives

pub mod analysis;
pub mod boundary;
pub mod closures;
pub mod config;
pub mod enthalpy;
pub mod flux;
pub mod io;
pub mod mesh;
pub mod physics;
pub mod polynomial;
pub mod simulation;
pub mod solver;
pub mod source;
pub mod time;

// Re-export main types for convenience
pub use config::{Config, ConfigError, DimensionalParams, ModelChoice};
pub use enthalpy::{EnthalpyMethod, EnthalpyMethodKind, PhaseSolveError};
pub use mesh::Grid;
pub use physics::{MushyLayerPhysics, PhysicsModule, PhysicsModuleInfo};
pub use simulation::{Simulation, SimulationError, SimulationResult, run_batch};
pub use solver::{Solution, State, StateFull};
pub use time::{EmbeddedRungeKutta, ForwardEuler, LinearisedBackwardEuler, Ros2, TimeIntegrator};
