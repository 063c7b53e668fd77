//! Uniform finite-volume grid on the unit column z ∈ [-1, 0].
//!
//! The column is split into `I` cells of width `step = 1/I`. Following the
//! usual ocean-model convention index 0 is the bottom (ocean side) and
//! index `I-1` is the top (atmosphere side).
//!
//! Three staggered point sets are stored:
//! - cell centers (length I), where prime variables live
//! - cell edges (length I+1), where fluxes and velocities live
//! - ghost centers (length I+2), centers padded with one ghost cell at each end
//!
//! ```text
//!   ghost   edge   center   edge   center  ...  center   edge   ghost
//!  -1-h/2    -1    -1+h/2  -1+h    ...          -h/2      0      h/2
//! ```
//!
//! The finite-volume operators act on these point sets:
//! - [`Grid::diff_edges`]: edge values (I+1) → cell derivative (I)
//! - [`Grid::diff_ghosts`]: ghost values (I+2) → edge derivative (I+1)
//! - [`upwind`], [`geometric`], [`average`]: ghost values (I+2) → edge values (I+1)

use crate::flux::upwind_flux;

/// Boundary of the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryFace {
    /// Ice-ocean side (z = -1)
    Bottom,
    /// Surface side (z = 0)
    Top,
}

/// Uniform 1D finite-volume grid on [-1, 0].
#[derive(Clone, Debug)]
pub struct Grid {
    n_cells: usize,
    step: f64,
    centers: Vec<f64>,
    edges: Vec<f64>,
    ghosts: Vec<f64>,
}

impl Grid {
    /// Create a uniform grid with `n_cells` cells.
    pub fn new(n_cells: usize) -> Self {
        assert!(n_cells > 0, "Need at least one cell");

        let step = 1.0 / n_cells as f64;

        let centers: Vec<f64> = (0..n_cells)
            .map(|i| -1.0 + (2 * i + 1) as f64 * step / 2.0)
            .collect();
        let edges: Vec<f64> = (0..=n_cells).map(|i| -1.0 + i as f64 * step).collect();

        let mut ghosts = Vec::with_capacity(n_cells + 2);
        ghosts.push(-1.0 - step / 2.0);
        ghosts.extend_from_slice(&centers);
        ghosts.push(step / 2.0);

        Self {
            n_cells,
            step,
            centers,
            edges,
            ghosts,
        }
    }

    /// Number of cells I.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// Number of edges I+1.
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.n_cells + 1
    }

    /// Cell width.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Cell center positions (length I).
    #[inline]
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Cell edge positions (length I+1).
    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Cell centers padded with one ghost cell at each end (length I+2).
    #[inline]
    pub fn ghosts(&self) -> &[f64] {
        &self.ghosts
    }

    /// Index of the interior cell adjacent to a boundary.
    #[inline]
    pub fn boundary_cell(&self, face: BoundaryFace) -> usize {
        match face {
            BoundaryFace::Bottom => 0,
            BoundaryFace::Top => self.n_cells - 1,
        }
    }

    /// Divergence of an edge field: `(f[i+1] - f[i]) / step`.
    ///
    /// Maps I+1 edge values to I cell values.
    pub fn diff_edges(&self, edge_values: &[f64]) -> Vec<f64> {
        debug_assert_eq!(edge_values.len(), self.n_cells + 1);
        edge_values
            .windows(2)
            .map(|w| (w[1] - w[0]) / self.step)
            .collect()
    }

    /// Gradient of a ghost-padded center field evaluated on edges.
    ///
    /// Maps I+2 ghost values to I+1 edge values.
    pub fn diff_ghosts(&self, ghost_values: &[f64]) -> Vec<f64> {
        debug_assert_eq!(ghost_values.len(), self.n_cells + 2);
        ghost_values
            .windows(2)
            .map(|w| (w[1] - w[0]) / self.step)
            .collect()
    }

    /// Cells whose center lies inside the ice, given a positive ice depth.
    pub fn is_ice(&self, ice_depth: f64) -> Vec<bool> {
        self.centers.iter().map(|&z| z > -ice_depth).collect()
    }
}

// =============================================================================
// Edge reconstructions of ghost-padded fields
// =============================================================================

/// Upwind value on each edge given the edge velocity.
///
/// `max(v, 0) * lower + min(v, 0) * upper` so the flux takes the value from
/// the cell the flow is coming from.
pub fn upwind(ghost_values: &[f64], velocity: &[f64]) -> Vec<f64> {
    debug_assert_eq!(ghost_values.len(), velocity.len() + 1);
    ghost_values
        .windows(2)
        .zip(velocity)
        .map(|(w, &v)| upwind_flux(w[0], w[1], v))
        .collect()
}

/// Geometric mean of neighbouring cells on each edge.
pub fn geometric(ghost_values: &[f64]) -> Vec<f64> {
    ghost_values
        .windows(2)
        .map(|w| (w[0] * w[1]).sqrt())
        .collect()
}

/// Arithmetic mean of neighbouring cells on each edge.
pub fn average(ghost_values: &[f64]) -> Vec<f64> {
    ghost_values
        .windows(2)
        .map(|w| 0.5 * (w[0] + w[1]))
        .collect()
}
