//! Stability monitoring for mushy layer runs.
//!
//! The explicit solver is only stable for Courant numbers `dt / step²`
//! up to one half. Exceeding the limit is reported but does not stop a
//! run; non-finite values always do.
//!
//! # Example
//!
//! ```
//! use mushy_rs::analysis::{StabilityMonitor, StabilityThresholds};
//! use mushy_rs::solver::State;
//!
//! let monitor = StabilityMonitor::new(StabilityThresholds::default());
//! let state = State::eqm(0.0, vec![0.1; 10], vec![0.0; 10], vec![0.0; 10]);
//!
//! let status = monitor.check(&state, 1e-2, 0.1);
//! assert!(status.has_warnings());
//! assert!(!status.has_critical_warnings());
//! ```

use crate::solver::State;

/// Thresholds for stability monitoring.
#[derive(Debug, Clone, Copy)]
pub struct StabilityThresholds {
    /// Largest Courant number `dt / step²` of the explicit scheme.
    pub max_courant: f64,
}

impl Default for StabilityThresholds {
    fn default() -> Self {
        Self { max_courant: 0.5 }
    }
}

/// Types of stability warnings.
#[derive(Debug, Clone, PartialEq)]
pub enum StabilityWarning {
    /// Courant number of the explicit scheme above its limit.
    CourantExceeded { courant: f64, limit: f64 },
    /// Non-finite value (NaN or Inf) in a prime variable.
    NonFiniteValue {
        time: f64,
        field: &'static str,
        cell: usize,
    },
}

impl std::fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CourantExceeded { courant, limit } => write!(
                f,
                "Courant number {:.3} exceeds {:.3}, explicit scheme may be unstable",
                courant, limit
            ),
            Self::NonFiniteValue { time, field, cell } => {
                write!(f, "Non-finite {} in cell {} at t = {:.6}", field, cell, time)
            }
        }
    }
}

/// Current stability status of the solution.
#[derive(Debug, Clone)]
pub struct StabilityStatus {
    /// Courant number of the checked step.
    pub courant: f64,
    /// Whether the solution is stable.
    pub is_stable: bool,
    /// List of warnings detected.
    pub warnings: Vec<StabilityWarning>,
}

impl StabilityStatus {
    /// Check if any warnings were generated.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether a non-finite value was found.
    pub fn has_critical_warnings(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, StabilityWarning::NonFiniteValue { .. }))
    }
}

/// Courant warning for an explicit step, if the limit is exceeded.
pub fn courant_warning(dt: f64, step: f64, limit: f64) -> Option<StabilityWarning> {
    let courant = dt / (step * step);
    (courant > limit).then_some(StabilityWarning::CourantExceeded { courant, limit })
}

/// Per-step stability checks of the explicit solver.
#[derive(Debug, Clone)]
pub struct StabilityMonitor {
    thresholds: StabilityThresholds,
}

impl StabilityMonitor {
    /// Create a new stability monitor with the given thresholds.
    pub fn new(thresholds: StabilityThresholds) -> Self {
        Self { thresholds }
    }

    /// Check a state and the explicit step that produced it.
    pub fn check(&self, state: &State, dt: f64, step: f64) -> StabilityStatus {
        let mut warnings = Vec::new();
        if let Some((field, cell)) = state.first_non_finite() {
            warnings.push(StabilityWarning::NonFiniteValue {
                time: state.time,
                field,
                cell,
            });
        }
        let courant = dt / (step * step);
        if let Some(warning) = courant_warning(dt, step, self.thresholds.max_courant) {
            warnings.push(warning);
        }

        StabilityStatus {
            courant,
            is_stable: warnings.is_empty(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: usize) -> State {
        State::eqm(0.0, vec![0.1; n], vec![0.0; n], vec![0.0; n])
    }

    #[test]
    fn test_courant_limit_is_strict() {
        assert!(courant_warning(0.5e-2, 0.1, 0.5).is_none());
        let warning = courant_warning(0.6e-2, 0.1, 0.5).unwrap();
        assert!(matches!(
            warning,
            StabilityWarning::CourantExceeded { courant, .. } if (courant - 0.6).abs() < 1e-12
        ));
        assert!(warning.to_string().contains("0.600"));
    }

    #[test]
    fn test_courant_warning_is_not_critical() {
        let monitor = StabilityMonitor::new(StabilityThresholds::default());
        let status = monitor.check(&state(10), 1.0, 0.1);
        assert!(!status.is_stable);
        assert!((status.courant - 100.0).abs() < 1e-9);
        assert!(!status.has_critical_warnings());
    }

    #[test]
    fn test_non_finite_is_critical() {
        let monitor = StabilityMonitor::new(StabilityThresholds::default());
        let mut bad = state(4);
        bad.salt[2] = f64::NAN;
        let status = monitor.check(&bad, 1e-4, 0.25);
        assert!(status.has_critical_warnings());
        assert_eq!(
            status.warnings[0],
            StabilityWarning::NonFiniteValue {
                time: 0.0,
                field: "salt",
                cell: 2
            }
        );
        assert!(monitor.check(&state(4), 1e-4, 0.25).is_stable);
    }
}
