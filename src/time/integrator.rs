//! Trait-based time integrator abstraction.
//!
//! This module provides traits for time integration that enable:
//! - Generic time integrators that work with any state type
//! - Fallible right-hand sides (phase solve, forcing lookup) propagated with `?`
//! - Both compile-time and runtime dispatch options
//!
//! # Example
//! ```
//! use mushy_rs::solver::State;
//! use mushy_rs::time::{ForwardEuler, TimeIntegrator};
//!
//! let state = State::eqm(0.0, vec![1.0; 4], vec![0.0; 4], vec![0.0; 4]);
//!
//! // Linear RHS: dq/dt = -q (exponential decay)
//! let next = ForwardEuler
//!     .step(&state, 0.1, 0.0, |s: &State, _t| {
//!         let mut rhs = s.clone();
//!         rhs.scale(-1.0);
//!         Ok::<_, std::convert::Infallible>(rhs)
//!     })
//!     .unwrap();
//! assert!((next.enthalpy[0] - 0.9).abs() < 1e-14);
//! ```

use thiserror::Error;

use crate::solver::State;

// =============================================================================
// Integrable Trait
// =============================================================================

/// Trait for state types that can be time-integrated.
///
/// This provides the vector space operations needed by explicit time integrators:
/// - `scale`: Multiply by scalar (x <- c * x)
/// - `axpy`: Add scaled vector (x <- x + c * y)
/// - `components`: flat views used by error norms
pub trait Integrable: Clone + Send + Sized {
    /// Scale the state by a constant: self <- c * self
    fn scale(&mut self, c: f64);

    /// Add a scaled vector: self <- self + c * other
    fn axpy(&mut self, c: f64, other: &Self);

    /// All values of the state, one slice per variable.
    fn components(&self) -> Vec<&[f64]>;

    /// Create a zero-initialized state with the same shape.
    ///
    /// Default implementation clones and scales by zero.
    fn zeros_like(&self) -> Self {
        let mut result = self.clone();
        result.scale(0.0);
        result
    }

    /// Whether every value is finite.
    fn is_finite(&self) -> bool {
        self.components()
            .iter()
            .all(|values| values.iter().all(|v| v.is_finite()))
    }
}

impl Integrable for State {
    fn scale(&mut self, c: f64) {
        State::scale(self, c);
    }

    fn axpy(&mut self, c: f64, other: &Self) {
        State::axpy(self, c, other);
    }

    fn components(&self) -> Vec<&[f64]> {
        self.fields().into_iter().map(|(_, values)| values).collect()
    }

    fn zeros_like(&self) -> Self {
        self.zeros_with_shape()
    }
}

// =============================================================================
// Step errors
// =============================================================================

/// Failure of a time step.
#[derive(Debug, Error)]
pub enum StepError<E> {
    /// The right-hand side could not be evaluated.
    #[error(transparent)]
    Rhs(E),

    /// The integrator could not produce a finite, accurate state.
    #[error("Integrator diverged at t = {time}: {reason}")]
    Divergence { time: f64, reason: String },
}

impl<E> StepError<E> {
    pub fn divergence(time: f64, reason: impl Into<String>) -> Self {
        StepError::Divergence {
            time,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// IntegratorInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Non-generic information about a time integrator.
///
/// This trait is separate from [`TimeIntegrator`] to allow calling info methods
/// without specifying a state type. It is also dyn-compatible.
pub trait IntegratorInfo: Send + Sync {
    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Order of accuracy of the integrator.
    fn order(&self) -> usize;

    /// Number of RHS evaluations per step (per accepted sub-step for
    /// adaptive integrators).
    fn n_stages(&self) -> usize;

    /// Whether the integrator chooses its own internal steps.
    fn is_adaptive(&self) -> bool {
        false
    }
}

// =============================================================================
// TimeIntegrator Trait
// =============================================================================

/// Trait for time integrators.
///
/// Time integrators advance the state from time `t` to `t + dt` using one
/// or more RHS evaluations. The RHS function receives a state and time and
/// returns the time derivative or the error that prevented its evaluation.
///
/// A step produces a new state; the input is left untouched so a failed
/// step can report the last good state.
pub trait TimeIntegrator<S: Integrable>: IntegratorInfo {
    /// Advance the state by `dt`.
    ///
    /// # Arguments
    /// * `state` - State at time `t`
    /// * `dt` - Time step size
    /// * `t` - Current time
    /// * `rhs` - Function computing the RHS: f(state, time) -> time_derivative
    fn step<F, E>(&self, state: &S, dt: f64, t: f64, rhs: F) -> Result<S, StepError<E>>
    where
        F: FnMut(&S, f64) -> Result<S, E>;
}

// =============================================================================
// Forward Euler
// =============================================================================

/// Forward Euler integrator (1st order).
///
/// ```text
/// u_new = u + dt * L(u, t)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl IntegratorInfo for ForwardEuler {
    fn name(&self) -> &'static str {
        "forward-euler"
    }

    fn order(&self) -> usize {
        1
    }

    fn n_stages(&self) -> usize {
        1
    }
}

impl<S: Integrable> TimeIntegrator<S> for ForwardEuler {
    fn step<F, E>(&self, state: &S, dt: f64, t: f64, mut rhs: F) -> Result<S, StepError<E>>
    where
        F: FnMut(&S, f64) -> Result<S, E>,
    {
        let l_u = rhs(state, t).map_err(StepError::Rhs)?;
        let mut next = state.clone();
        next.axpy(dt, &l_u);
        Ok(next)
    }
}

// =============================================================================
// Heun (explicit trapezoidal rule)
// =============================================================================

/// Heun's method (2nd order), used to check the convergence order of the
/// explicit right-hand side.
///
/// ```text
/// u1    = u + dt * L(u, t)
/// u_new = u + dt/2 * (L(u, t) + L(u1, t + dt))
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Heun;

impl IntegratorInfo for Heun {
    fn name(&self) -> &'static str {
        "heun"
    }

    fn order(&self) -> usize {
        2
    }

    fn n_stages(&self) -> usize {
        2
    }
}

impl<S: Integrable> TimeIntegrator<S> for Heun {
    fn step<F, E>(&self, state: &S, dt: f64, t: f64, mut rhs: F) -> Result<S, StepError<E>>
    where
        F: FnMut(&S, f64) -> Result<S, E>,
    {
        let k1 = rhs(state, t).map_err(StepError::Rhs)?;
        let mut u1 = state.clone();
        u1.axpy(dt, &k1);
        let k2 = rhs(&u1, t + dt).map_err(StepError::Rhs)?;

        let mut next = state.clone();
        next.axpy(0.5 * dt, &k1);
        next.axpy(0.5 * dt, &k2);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn decay(s: &State, _t: f64) -> Result<State, Infallible> {
        let mut rhs = s.clone();
        rhs.scale(-1.0);
        Ok(rhs)
    }

    fn unit_state() -> State {
        State::eqm(0.0, vec![1.0; 3], vec![1.0; 3], vec![1.0; 3])
    }

    #[test]
    fn test_forward_euler_decay() {
        let next = ForwardEuler.step(&unit_state(), 0.1, 0.0, decay).unwrap();
        assert!(next.enthalpy.iter().all(|&v| (v - 0.9).abs() < 1e-14));
    }

    #[test]
    fn test_heun_second_order() {
        let exact = (-1.0_f64).exp();
        let error = |n: usize| {
            let dt = 1.0 / n as f64;
            let mut u = unit_state();
            for k in 0..n {
                u = Heun.step(&u, dt, k as f64 * dt, decay).unwrap();
            }
            (u.enthalpy[0] - exact).abs()
        };
        let ratio = error(20) / error(40);
        assert!(ratio > 3.5 && ratio < 4.5, "ratio = {}", ratio);
    }

    #[test]
    fn test_rhs_error_propagates() {
        let result: Result<State, StepError<&str>> =
            ForwardEuler.step(&unit_state(), 0.1, 0.0, |_s: &State, _t| Err("no forcing"));
        assert!(matches!(result, Err(StepError::Rhs("no forcing"))));
    }

    #[test]
    fn test_integrable_components() {
        let state = State::diseq(0.0, vec![1.0], vec![2.0], vec![3.0], vec![f64::NAN]);
        assert_eq!(state.components().len(), 4);
        assert!(!Integrable::is_finite(&state));
    }
}
