//! Discretisation and time stepping settings.

use serde::{Deserialize, Serialize};

/// Time stepping scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverChoice {
    /// Forward Euler with upwind advection.
    #[default]
    Explicit,
    /// Backward Euler on conduction, explicit transport.
    Implicit,
    /// Adaptive step size with error control.
    #[serde(alias = "SCI")]
    Adaptive,
}

/// Scheme used by the adaptive solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveScheme {
    /// Bogacki-Shampine 3(2)
    #[default]
    Rk23,
    /// Dormand-Prince 5(4)
    Rk45,
    /// Linearly implicit Rosenbrock W-method, conduction taken implicitly
    Ros2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericalParams {
    /// Number of cells.
    /// default: 50
    #[serde(rename = "I")]
    pub n_cells: usize,

    /// Fixed timestep of the explicit and implicit solvers.
    /// default: 2e-4
    pub timestep: f64,

    /// Small constant keeping divisions by the liquid fraction finite.
    /// default: 1e-6
    pub regularisation: f64,

    /// default: explicit
    pub solver: SolverChoice,

    /// Limit the explicit timestep by the diffusive and advective stability bounds.
    /// default: false
    pub adaptive_timestepping: bool,

    /// default: rk23
    pub adaptive_scheme: AdaptiveScheme,

    /// Relative tolerance of the adaptive solver.
    /// default: 1e-3
    pub rtol: f64,

    /// Absolute tolerance of the adaptive solver.
    /// default: 1e-6
    pub atol: f64,
}

impl Default for NumericalParams {
    fn default() -> Self {
        Self {
            n_cells: 50,
            timestep: 2e-4,
            regularisation: 1e-6,
            solver: SolverChoice::Explicit,
            adaptive_timestepping: false,
            adaptive_scheme: AdaptiveScheme::Rk23,
            rtol: 1e-3,
            atol: 1e-6,
        }
    }
}

impl NumericalParams {
    /// Cell width `1 / I`.
    #[inline]
    pub fn step(&self) -> f64 {
        1.0 / self.n_cells as f64
    }

    /// Courant number `dt / step²` of the fixed timestep.
    #[inline]
    pub fn courant_number(&self) -> f64 {
        self.timestep / self.step().powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_courant_number() {
        let params = NumericalParams::default();
        assert!((params.step() - 0.02).abs() < 1e-14);
        assert!((params.courant_number() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_adaptive_scheme_names() {
        let scheme: AdaptiveScheme = serde_yaml::from_str("ros2").unwrap();
        assert_eq!(scheme, AdaptiveScheme::Ros2);
        let yaml = "adaptive_scheme: rk45\n";
        let params: NumericalParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(params.adaptive_scheme, AdaptiveScheme::Rk45);
    }

    #[test]
    fn test_solver_alias() {
        let choice: SolverChoice = serde_yaml::from_str("SCI").unwrap();
        assert_eq!(choice, SolverChoice::Adaptive);
        let choice: SolverChoice = serde_yaml::from_str("implicit").unwrap();
        assert_eq!(choice, SolverChoice::Implicit);
    }
}
