//! Effective thermal conductivity.

use crate::config::PhysicalParams;
use crate::mesh::geometric;

/// Conductivity of a cell relative to the liquid, `φl + λ φs` when phase
/// averaging is enabled and one otherwise.
#[inline]
pub fn conductivity(liquid_fraction: f64, solid_fraction: f64, params: &PhysicalParams) -> f64 {
    if params.phase_average_conductivity {
        liquid_fraction + params.conductivity_ratio * solid_fraction
    } else {
        1.0
    }
}

/// Conductivity on edges: geometric mean of the ghost-padded cell values.
pub fn edge_conductivity(
    liquid_fraction: &[f64],
    solid_fraction: &[f64],
    params: &PhysicalParams,
) -> Vec<f64> {
    let cells: Vec<f64> = liquid_fraction
        .iter()
        .zip(solid_fraction)
        .map(|(&l, &s)| conductivity(l, s, params))
        .collect();
    geometric(&cells)
}
