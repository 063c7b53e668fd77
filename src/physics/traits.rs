//! Physics module traits.
//!
//! This module defines the core trait interfaces for physics modules.

use crate::mesh::Grid;
use crate::time::Integrable;

// =============================================================================
// PhysicsModuleInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Non-generic information about a physics module.
///
/// This trait is separate from [`PhysicsModule`] to allow calling info methods
/// without specifying a state type.
pub trait PhysicsModuleInfo: Send + Sync {
    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Short description of the physics being modeled.
    fn description(&self) -> &str;

    /// Number of prime variables in the system.
    fn n_variables(&self) -> usize;

    /// Names of the prime variables (e.g., ["enthalpy", "salt", "gas"]).
    fn variable_names(&self) -> &[&'static str];
}

// =============================================================================
// PhysicsModule Trait
// =============================================================================

/// Core trait for physics modules.
///
/// A physics module encapsulates everything needed to compute the
/// semi-discrete right-hand side of a PDE system, including:
/// - Closure of the prime variables (phase state)
/// - Boundary condition handling
/// - Flux computation
/// - Source term evaluation
///
/// # Type Parameters
///
/// * `S` - State type (must implement [`Integrable`])
pub trait PhysicsModule<S: Integrable>: PhysicsModuleInfo {
    /// Error raised when the right-hand side cannot be evaluated.
    type Error;

    /// Compute the semi-discrete right-hand side `dq/dt = L(q, t)`.
    fn compute_rhs(&self, state: &S, time: f64) -> Result<S, Self::Error>;

    /// Largest stable explicit time step, at most `max_dt`.
    fn compute_dt(&self, state: &S, max_dt: f64) -> Result<f64, Self::Error>;

    /// Post-process the state after each time step.
    ///
    /// Default implementation does nothing.
    fn post_process(&self, _state: &mut S) {}

    /// The grid the module discretises.
    fn grid(&self) -> &Grid;
}
