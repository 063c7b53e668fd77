//! Gauss-Legendre quadrature.
//!
//! Used to average bubble rise velocities over a size distribution.

mod gauss;

pub use gauss::{GaussLegendre, legendre_and_derivative};
