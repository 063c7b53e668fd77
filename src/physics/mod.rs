//! Physics module abstraction.
//!
//! This module provides the interface between the discretised equations
//! and the time stepping. It abstracts over the details of:
//! - Phase closure through the enthalpy method
//! - Boundary condition handling
//! - Flux computation
//! - Source term composition
//!
//! # Key Traits
//!
//! - [`PhysicsModule`]: Core trait for physics computations (RHS, dt, post-processing)
//! - [`PhysicsModuleInfo`]: Name and variables of a module
//!
//! # Example
//! ```
//! use mushy_rs::config::Config;
//! use mushy_rs::physics::{MushyLayerPhysics, PhysicsModuleInfo};
//!
//! let physics = MushyLayerPhysics::from_config(&Config::default()).unwrap();
//! assert_eq!(physics.variable_names(), &["enthalpy", "salt", "gas"]);
//! ```

pub mod mushy_layer;
pub mod traits;

pub use mushy_layer::{MushyLayerPhysics, RhsError, RhsEvaluation};
pub use traits::{PhysicsModule, PhysicsModuleInfo};
