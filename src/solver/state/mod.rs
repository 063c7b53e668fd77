//! State types of the mushy layer solver.
//!
//! - [`State`]: prime variables advanced in time
//! - [`StateFull`]: prime variables plus the phase state from the enthalpy method
//! - [`StateBCs`]: full state padded with boundary ghost cells

mod bcs;
mod full;
mod prime;

pub use bcs::{GhostCell, StateBCs};
pub use full::StateFull;
pub use prime::{PrimeCell, State};
