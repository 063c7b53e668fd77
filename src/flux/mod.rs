//! Numerical fluxes on cell edges.
//!
//! - [`upwind_flux`]: first order upwind advection through one edge
//! - [`TransportFluxes`]: heat, salt and gas fluxes of the mushy layer,
//!   combining diffusion, brine advection, bubble rise and frame motion

mod transport;
mod upwind;

pub use transport::{EdgeFluxes, TransportFluxes};
pub use upwind::{centred_flux, upwind_flux};
