//! Linearised backward Euler for conduction.
//!
//! Conduction is the stiff part of the enthalpy equation. With the
//! effective conductivity frozen at the start of the step and the
//! temperature linearised as `T(H + ΔH) ≈ T(H) + (dT/dH) ΔH`, a backward
//! Euler step of the conductive term reduces to one tridiagonal system
//!
//! ```text
//! (I - dt A D) ΔH = dt R
//! ```
//!
//! where A is the discrete conduction operator on interior cells, D the
//! diagonal of dT/dH and R the full right-hand side at the old state.
//! All other terms (salt, gas, advection, sources) are therefore taken
//! explicitly, exactly as in forward Euler.

use thiserror::Error;

use crate::solver::State;

use super::integrator::{IntegratorInfo, StepError};

/// Pivot magnitude below which the system is treated as singular.
pub const PIVOT_TOLERANCE: f64 = 1e-300;

/// Failure of the tridiagonal solve.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum TridiagonalError {
    #[error("Singular or non-finite pivot {pivot} in row {row}")]
    SingularPivot { row: usize, pivot: f64 },
    #[error("Tridiagonal system has inconsistent band lengths")]
    Shape,
}

/// Tridiagonal matrix stored by bands.
///
/// Row i reads `lower[i] x[i-1] + diag[i] x[i] + upper[i] x[i+1]`;
/// `lower[0]` and `upper[n-1]` are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Tridiagonal {
    pub lower: Vec<f64>,
    pub diag: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Tridiagonal {
    pub fn new(lower: Vec<f64>, diag: Vec<f64>, upper: Vec<f64>) -> Self {
        Self { lower, diag, upper }
    }

    pub fn identity(n: usize) -> Self {
        Self::new(vec![0.0; n], vec![1.0; n], vec![0.0; n])
    }

    pub fn len(&self) -> usize {
        self.diag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// y = M x
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let n = self.len();
        (0..n)
            .map(|i| {
                let mut y = self.diag[i] * x[i];
                if i > 0 {
                    y += self.lower[i] * x[i - 1];
                }
                if i + 1 < n {
                    y += self.upper[i] * x[i + 1];
                }
                y
            })
            .collect()
    }

    /// Solve M x = rhs with the Thomas algorithm (no pivoting).
    pub fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, TridiagonalError> {
        let n = self.len();
        if self.lower.len() != n || self.upper.len() != n || rhs.len() != n {
            return Err(TridiagonalError::Shape);
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        let pivot = self.diag[0];
        check_pivot(0, pivot)?;
        c_prime[0] = self.upper[0] / pivot;
        d_prime[0] = rhs[0] / pivot;

        for i in 1..n {
            let pivot = self.diag[i] - self.lower[i] * c_prime[i - 1];
            check_pivot(i, pivot)?;
            c_prime[i] = if i + 1 < n { self.upper[i] / pivot } else { 0.0 };
            d_prime[i] = (rhs[i] - self.lower[i] * d_prime[i - 1]) / pivot;
        }

        let mut x = d_prime;
        for i in (0..n - 1).rev() {
            x[i] -= c_prime[i] * x[i + 1];
        }
        Ok(x)
    }
}

fn check_pivot(row: usize, pivot: f64) -> Result<(), TridiagonalError> {
    if pivot.is_finite() && pivot.abs() > PIVOT_TOLERANCE {
        Ok(())
    } else {
        Err(TridiagonalError::SingularPivot { row, pivot })
    }
}

/// Right-hand side of one step with the linearised conduction operator.
#[derive(Clone, Debug)]
pub struct LinearisedRhs {
    /// Full time derivative at the old state.
    pub derivative: State,
    /// Conduction operator `A D` acting on ΔH (interior cells only).
    pub conduction: Tridiagonal,
}

/// Backward Euler on conduction, forward Euler on everything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearisedBackwardEuler;

impl IntegratorInfo for LinearisedBackwardEuler {
    fn name(&self) -> &'static str {
        "linearised-backward-euler"
    }

    fn order(&self) -> usize {
        1
    }

    fn n_stages(&self) -> usize {
        1
    }
}

impl LinearisedBackwardEuler {
    /// Advance `state` by `dt`.
    ///
    /// `linearise` evaluates the full right-hand side and the conduction
    /// operator at the given state and time.
    pub fn step<F, E>(
        &self,
        state: &State,
        dt: f64,
        t: f64,
        linearise: F,
    ) -> Result<State, StepError<E>>
    where
        F: FnOnce(&State, f64) -> Result<LinearisedRhs, E>,
    {
        let LinearisedRhs {
            derivative,
            conduction,
        } = linearise(state, t).map_err(StepError::Rhs)?;

        let n = conduction.len();
        let system = Tridiagonal::new(
            conduction.lower.iter().map(|a| -dt * a).collect(),
            conduction.diag.iter().map(|a| 1.0 - dt * a).collect(),
            conduction.upper.iter().map(|a| -dt * a).collect(),
        );
        let rhs: Vec<f64> = derivative.enthalpy.iter().map(|r| dt * r).collect();
        debug_assert_eq!(rhs.len(), n);

        let delta = system
            .solve(&rhs)
            .map_err(|e| StepError::divergence(t, e.to_string()))?;

        let mut next = state.clone();
        next.axpy(dt, &derivative);
        for ((h, h0), dh) in next.enthalpy.iter_mut().zip(&state.enthalpy).zip(delta) {
            *h = h0 + dh;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn laplacian(n: usize, k: f64) -> Tridiagonal {
        Tridiagonal::new(vec![k; n], vec![-2.0 * k; n], vec![k; n])
    }

    #[test]
    fn test_thomas_solves_known_system() {
        let m = Tridiagonal::new(
            vec![0.0, -1.0, -1.0, -1.0],
            vec![2.0, 2.0, 2.0, 2.0],
            vec![-1.0, -1.0, -1.0, 0.0],
        );
        let x_true = vec![1.0, -2.0, 0.5, 3.0];
        let rhs = m.apply(&x_true);
        let x = m.solve(&rhs).unwrap();
        for (a, b) in x.iter().zip(&x_true) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_singular_pivot_reported() {
        let m = Tridiagonal::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]);
        assert!(matches!(
            m.solve(&[1.0, 1.0]),
            Err(TridiagonalError::SingularPivot { row: 0, .. })
        ));
    }

    #[test]
    fn test_backward_euler_is_unconditionally_stable() {
        // Huge timestep on a decaying profile stays bounded
        let n = 8;
        let state = State::eqm(
            0.0,
            (0..n).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect(),
            vec![0.0; n],
            vec![0.0; n],
        );
        let next = LinearisedBackwardEuler
            .step(&state, 1e3, 0.0, |s: &State, _t| {
                let conduction = laplacian(n, 100.0);
                let mut derivative = s.zeros_with_shape();
                derivative.enthalpy = conduction.apply(&s.enthalpy);
                Ok::<_, Infallible>(LinearisedRhs {
                    derivative,
                    conduction,
                })
            })
            .unwrap();
        assert!(next.enthalpy.iter().all(|h| h.abs() < 1.0));
    }

    #[test]
    fn test_zero_conduction_matches_forward_euler() {
        let state = State::eqm(0.0, vec![1.0, 2.0], vec![0.5, 0.5], vec![0.0, 0.0]);
        let next = LinearisedBackwardEuler
            .step(&state, 0.1, 0.0, |s: &State, _t| {
                let mut derivative = s.clone();
                derivative.scale(-1.0);
                Ok::<_, Infallible>(LinearisedRhs {
                    derivative,
                    conduction: Tridiagonal::new(vec![0.0; 2], vec![0.0; 2], vec![0.0; 2]),
                })
            })
            .unwrap();
        assert!((next.enthalpy[1] - 1.8).abs() < 1e-14);
        assert!((next.salt[0] - 0.45).abs() < 1e-14);
    }
}
