//! Upwind numerical flux for advection through a cell edge.
//!
//! For the advection equation dq/dt + ∂(v q)/∂z = 0 the upwind flux at an
//! edge between a lower and an upper cell is:
//! F^* = v q_lower if v > 0 (flow upward, use the cell below)
//! F^* = v q_upper if v < 0 (flow downward, use the cell above)
//!
//! Written with the positive and negative parts of the velocity the two
//! cases combine into `max(v, 0) q_lower + min(v, 0) q_upper`, which is
//! continuous in v and vanishes on a stagnant edge.

/// Upwind flux through one edge.
///
/// # Arguments
/// * `lower` - Value in the cell below the edge
/// * `upper` - Value in the cell above the edge
/// * `velocity` - Edge velocity, positive upward
#[inline]
pub fn upwind_flux(lower: f64, upper: f64, velocity: f64) -> f64 {
    velocity.max(0.0) * lower + velocity.min(0.0) * upper
}

/// Centred (arithmetic mean) flux through one edge, used to measure the
/// numerical diffusion of the upwind flux.
#[inline]
pub fn centred_flux(lower: f64, upper: f64, velocity: f64) -> f64 {
    0.5 * velocity * (lower + upper)
}
