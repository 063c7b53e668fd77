//! Volumetric source terms of the mushy layer equations.
//!
//! Source terms represent exchanges that are not part of the edge fluxes:
//! - Brine channel drainage (heat, salt and gas sinks)
//! - Bubble nucleation and dissolution (DISEQ model)
//! - Absorbed shortwave radiation
//!
//! # Submodules
//!
//! - [`traits`]: [`SourceTerm`] trait, evaluation context and composition
//! - [`brine_convection`]: drainage flow and its sinks

pub mod brine_convection;
mod nucleation;
mod radiative;
pub mod traits;

pub use brine_convection::{
    BrineChannelFlow, BrineChannelSink, DrainageError, ice_ocean_boundary_depth,
};
pub use nucleation::{Nucleation, nucleation_rate};
pub use radiative::{
    BRINE_VISIBLE_EXTINCTION, BUBBLE_VISIBLE_EXTINCTION, ICE_VISIBLE_EXTINCTION,
    INFRARED_EXTINCTION, RadiativeHeating, ShortwaveColumn, ShortwaveModel, TwoBandBeerLambert,
    solar_fraction_below,
};
pub use traits::{CombinedSource, SourceContext, SourceTerm};
