//! Linearly implicit adaptive integration for stiff conduction.
//!
//! ROS2 of Verwer, Spee, Blom & Hundsdorfer (1999) is a two stage
//! Rosenbrock W-method. With `W = I - γ h J`, γ = 1 + 1/√2,
//!
//! ```text
//! W k1 = f(t, y)
//! W k2 = f(t + h, y + h k1) - 2 k1
//! y_n+1 = y + 3/2 h k1 + 1/2 h k2
//! ```
//!
//! It is L-stable and second order for any matrix J, so J only needs to
//! capture the stiff part of the problem. Here J is the linearised
//! conduction operator acting on enthalpy and zero elsewhere: conduction is
//! treated implicitly through one tridiagonal solve per stage, the
//! remaining terms explicitly. The embedded first order solution
//! `y + h k1` gives the local error estimate `h (k1 + k2) / 2`.

use crate::solver::State;

use super::adaptive::{AdaptiveConfig, AdaptiveStats};
use super::implicit::{LinearisedRhs, Tridiagonal};
use super::integrator::{IntegratorInfo, StepError};

/// γ = 1 + 1/√2
pub const ROS2_GAMMA: f64 = 1.0 + std::f64::consts::FRAC_1_SQRT_2;

/// Adaptive ROS2 with conduction as the implicit part.
#[derive(Clone, Copy, Debug)]
pub struct Ros2 {
    pub config: AdaptiveConfig,
}

impl Ros2 {
    pub fn new(config: AdaptiveConfig) -> Self {
        Self { config }
    }

    /// Solve `W k = f` in place: the enthalpy row block goes through the
    /// tridiagonal system, every other variable has `W = I`.
    fn solve_stage<E>(w: &Tridiagonal, k: &mut State, t: f64) -> Result<(), StepError<E>> {
        k.enthalpy = w
            .solve(&k.enthalpy)
            .map_err(|e| StepError::divergence(t, e.to_string()))?;
        Ok(())
    }

    /// One attempted step: the propagated solution and its error norm.
    fn attempt<F, E>(
        &self,
        y: &State,
        t: f64,
        h: f64,
        linearise: &mut F,
    ) -> Result<(State, f64), StepError<E>>
    where
        F: FnMut(&State, f64) -> Result<LinearisedRhs, E>,
    {
        let LinearisedRhs {
            derivative,
            conduction,
        } = linearise(y, t).map_err(StepError::Rhs)?;

        let gh = ROS2_GAMMA * h;
        let w = Tridiagonal::new(
            conduction.lower.iter().map(|a| -gh * a).collect(),
            conduction.diag.iter().map(|a| 1.0 - gh * a).collect(),
            conduction.upper.iter().map(|a| -gh * a).collect(),
        );

        let mut k1 = derivative;
        Self::solve_stage(&w, &mut k1, t)?;

        let mut y1 = y.clone();
        y1.axpy(h, &k1);
        let mut k2 = linearise(&y1, t + h).map_err(StepError::Rhs)?.derivative;
        k2.axpy(-2.0, &k1);
        Self::solve_stage(&w, &mut k2, t)?;

        let mut y_new = y.clone();
        y_new.axpy(1.5 * h, &k1);
        y_new.axpy(0.5 * h, &k2);

        let mut error = k1;
        error.axpy(1.0, &k2);
        error.scale(0.5 * h);
        let norm = self.config.error_norm(&error, y, &y_new);
        Ok((y_new, norm))
    }

    /// Integrate from `t0` to exactly `t_end` starting with step `h0`.
    ///
    /// `linearise` evaluates the right-hand side and the conduction operator
    /// at the given state and time.
    pub fn integrate<F, E>(
        &self,
        y0: &State,
        t0: f64,
        t_end: f64,
        h0: f64,
        mut linearise: F,
    ) -> Result<(State, AdaptiveStats), StepError<E>>
    where
        F: FnMut(&State, f64) -> Result<LinearisedRhs, E>,
    {
        self.config.drive(
            self.order(),
            self.n_stages(),
            y0,
            t0,
            t_end,
            h0,
            |y, t, h| self.attempt(y, t, h, &mut linearise),
        )
    }
}

impl IntegratorInfo for Ros2 {
    fn name(&self) -> &'static str {
        "ros2"
    }

    fn order(&self) -> usize {
        2
    }

    fn n_stages(&self) -> usize {
        2
    }

    fn is_adaptive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Integrable;
    use std::convert::Infallible;

    /// Heat equation on enthalpy with diffusivity `k`, decay elsewhere.
    fn diffusion(k: f64) -> impl FnMut(&State, f64) -> Result<LinearisedRhs, Infallible> {
        move |s: &State, _t| {
            let n = s.enthalpy.len();
            let conduction = Tridiagonal::new(vec![k; n], vec![-2.0 * k; n], vec![k; n]);
            let mut derivative = s.clone();
            derivative.scale(-1.0);
            derivative.enthalpy = conduction.apply(&s.enthalpy);
            Ok(LinearisedRhs {
                derivative,
                conduction,
            })
        }
    }

    fn bump(n: usize) -> State {
        let enthalpy = (0..n)
            .map(|i| (std::f64::consts::PI * (i + 1) as f64 / (n + 1) as f64).sin())
            .collect();
        State::eqm(0.0, enthalpy, vec![1.0; n], vec![0.5; n])
    }

    #[test]
    fn test_decay_matches_exact_solution() {
        let ros2 = Ros2::new(AdaptiveConfig {
            rtol: 1e-6,
            atol: 1e-9,
            ..Default::default()
        });
        let (y, stats) = ros2
            .integrate(&bump(4), 0.0, 1.0, 0.01, diffusion(0.0))
            .unwrap();
        let exact = (-1.0_f64).exp();
        assert!((y.salt[0] - exact).abs() < 1e-4);
        assert!((y.gas[3] - 0.5 * exact).abs() < 1e-4);
        assert!(stats.accepted > 0);
    }

    #[test]
    fn test_stiff_conduction_takes_large_steps() {
        // Explicit stability would need h < 1 / (2k) = 5e-5
        let n = 20;
        let k = 1e4;
        let ros2 = Ros2::new(AdaptiveConfig {
            rtol: 1e-3,
            atol: 1e-6,
            ..Default::default()
        });
        let (y, stats) = ros2
            .integrate(&bump(n), 0.0, 1.0, 1e-4, diffusion(k))
            .unwrap();
        assert!(y.is_finite());
        assert!(y.enthalpy.iter().all(|h| h.abs() < 1e-3));
        assert!(stats.accepted < 1_000, "{} steps", stats.accepted);
    }

    #[test]
    fn test_two_evaluations_per_attempt() {
        let ros2 = Ros2::new(AdaptiveConfig::default());
        let (_, stats) = ros2
            .integrate(&bump(6), 0.0, 0.3, 1.0, diffusion(1.0))
            .unwrap();
        assert!(stats.accepted >= 1);
        assert_eq!(stats.rhs_evaluations, 2 * (stats.accepted + stats.rejected));
    }
}
