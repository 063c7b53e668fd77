//! Mesh representation.
//!
//! Provides the uniform 1D finite-volume grid on `z ∈ [-1, 0]`:
//! - Cell centers, edges and ghost-padded centers
//! - Difference operators between them
//! - Edge averages of ghost-padded arrays

mod grid;

pub use grid::{BoundaryFace, Grid, average, geometric, upwind};
