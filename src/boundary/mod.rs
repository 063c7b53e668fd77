//! Boundary conditions of the mushy layer column.
//!
//! Fluxes on the outermost edges are computed from one ghost cell at each
//! end of the column. The ocean ghost cell (bottom) holds far-field ocean
//! values and the surface ghost cell (top) holds the forced surface
//! temperature with the remaining fields mostly extrapolated.
//!
//! # Temperature forcing
//!
//! | Boundary | Variant | Ghost temperature |
//! |----------|---------|-------------------|
//! | Surface | `ConstantTemperature` | fixed value |
//! | Surface | `YearlyTemperature` | `A (cos(2π t/P) + offset)` |
//! | Surface | `SeriesTemperature` | interpolated record |
//! | Surface | `SurfaceEnergyBalance` | root of the surface energy balance |
//! | Ocean | `FixedTemperature` | far-field temperature |
//! | Ocean | `FixedHeatFlux` | `T_0 + F step / k_e` |
//! | Ocean | `Series` | interpolated record |

mod forcing;
mod ghost;
mod ocean;
mod surface_energy_balance;

pub use forcing::{ConstantTemperature, SeriesTemperature, TemperatureForcing, YearlyTemperature};
pub use ghost::{BoundaryConditions, ForcingSetupError, SurfaceForcing};
pub use ocean::OceanForcing;
pub use surface_energy_balance::{
    EMISSIVITY, SENSIBLE_HEAT_COEFFICIENT, STEFAN_BOLTZMANN, SurfaceEnergyBalance,
};

use crate::solver::GhostCell;

/// Context for evaluating a boundary temperature.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryContext {
    /// Current simulation time
    pub time: f64,
    /// Values in the interior cell next to the boundary
    pub interior: GhostCell,
    /// Effective conductivity of the boundary edge, turbulent part included.
    /// Ghost cells share the phase of their neighbour, so this is also the
    /// value the conductive flux uses there.
    pub conductivity: f64,
    /// Cell width
    pub step: f64,
}
