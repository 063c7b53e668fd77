//! Constitutive closures of the mushy layer.
//!
//! - [`permeability`]: Darcy permeability of the pore network
//! - [`conductivity`]: phase-averaged thermal conductivity
//! - [`BubbleModel`]: bubble rise velocity and lag for a size distribution
//! - [`VelocityClosure`]: liquid, gas and frame velocities on edges
//! - [`eddy_multiplier`]: turbulent diffusion below the ice

mod bubble;
mod conductivity;
mod eddy;
mod permeability;
mod velocities;

pub use bubble::{
    BubbleModel, SIZE_QUADRATURE_POINTS, hadamard_rybczynski_factor, lag_factor, wall_drag,
};
pub use conductivity::{conductivity, edge_conductivity};
pub use eddy::{EDDY_RAMP_SCALE, eddy_diffusivity, eddy_multiplier};
pub use permeability::{percolation_factor, permeability};
pub use velocities::{EdgeVelocities, VelocityClosure};
