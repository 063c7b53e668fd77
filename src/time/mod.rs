//! Time integration methods.
//!
//! - [`ForwardEuler`]: explicit upwind solver
//! - [`LinearisedBackwardEuler`]: implicit conduction with a tridiagonal solve
//! - [`EmbeddedRungeKutta`]: adaptive RK23 / RK45 with error control
//! - [`Ros2`]: adaptive linearly implicit scheme for stiff conduction

mod adaptive;
mod implicit;
mod integrator;
mod rosenbrock;

pub use adaptive::{
    AdaptiveConfig, AdaptiveStats, BOGACKI_SHAMPINE, ButcherTableau, DORMAND_PRINCE,
    EmbeddedRungeKutta,
};
pub use implicit::{
    LinearisedBackwardEuler, LinearisedRhs, PIVOT_TOLERANCE, Tridiagonal, TridiagonalError,
};
pub use integrator::{ForwardEuler, Heun, Integrable, IntegratorInfo, StepError, TimeIntegrator};
pub use rosenbrock::{ROS2_GAMMA, Ros2};
