//! Embedded Runge-Kutta integration with local error control.
//!
//! Each attempted step produces a solution of order p and an embedded
//! estimate of order p-1. Their difference, scaled by
//! `atol + rtol * max(|y_n|, |y_n+1|)`, gives an RMS error norm; the step
//! is accepted when the norm is at most one and the next step size is
//!
//! ```text
//! h_new = h * clamp(0.9 * err^(-1/p), 0.2, 5)
//! ```
//!
//! [`AdaptiveConfig::drive`] advances to an exact end time, shortening the
//! final step to land on it. The runner calls it once per save interval so
//! every archived state sits exactly at a save time. The same controller
//! drives the linearly implicit [`Ros2`](super::Ros2) scheme.

use crate::config::AdaptiveScheme;

use super::integrator::{Integrable, IntegratorInfo, StepError, TimeIntegrator};

// =============================================================================
// Butcher tableaux
// =============================================================================

/// Coefficients of an explicit embedded Runge-Kutta pair.
#[derive(Clone, Copy, Debug)]
pub struct ButcherTableau {
    pub name: &'static str,
    /// Stage times as fractions of the step.
    pub c: &'static [f64],
    /// Lower-triangular stage coefficients, row i has i entries.
    pub a: &'static [&'static [f64]],
    /// Weights of the propagated solution.
    pub b: &'static [f64],
    /// Weights of the embedded solution.
    pub b_hat: &'static [f64],
    /// Order of the propagated solution.
    pub order: usize,
}

impl ButcherTableau {
    pub fn n_stages(&self) -> usize {
        self.c.len()
    }
}

/// Bogacki-Shampine 3(2).
pub const BOGACKI_SHAMPINE: ButcherTableau = ButcherTableau {
    name: "rk23",
    c: &[0.0, 0.5, 0.75, 1.0],
    a: &[
        &[],
        &[0.5],
        &[0.0, 0.75],
        &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
    ],
    b: &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0, 0.0],
    b_hat: &[7.0 / 24.0, 0.25, 1.0 / 3.0, 0.125],
    order: 3,
};

/// Dormand-Prince 5(4).
pub const DORMAND_PRINCE: ButcherTableau = ButcherTableau {
    name: "rk45",
    c: &[0.0, 0.2, 0.3, 0.8, 8.0 / 9.0, 1.0, 1.0],
    a: &[
        &[],
        &[0.2],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
        &[
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
        ],
        &[
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
        ],
        &[
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
        ],
    ],
    b: &[
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
    b_hat: &[
        5179.0 / 57600.0,
        0.0,
        7571.0 / 16695.0,
        393.0 / 640.0,
        -92097.0 / 339200.0,
        187.0 / 2100.0,
        1.0 / 40.0,
    ],
    order: 5,
};

// =============================================================================
// Configuration and statistics
// =============================================================================

/// Step size control settings.
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveConfig {
    pub rtol: f64,
    pub atol: f64,
    /// Largest allowed step.
    pub max_step: f64,
    /// Steps below this fraction of the time scale count as underflow.
    pub min_step: f64,
    /// Consecutive rejections tolerated before giving up.
    pub max_rejections: usize,
    pub safety: f64,
    pub min_factor: f64,
    pub max_factor: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
            max_step: f64::INFINITY,
            min_step: 1e-14,
            max_rejections: 50,
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 5.0,
        }
    }
}

impl AdaptiveConfig {
    /// RMS of the error scaled by the mixed tolerance.
    pub fn error_norm<S: Integrable>(&self, error: &S, y0: &S, y1: &S) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for ((e, a), b) in error
            .components()
            .iter()
            .zip(y0.components())
            .zip(y1.components())
        {
            for ((&ei, &ai), &bi) in e.iter().zip(a).zip(b) {
                let scale = self.atol + self.rtol * ai.abs().max(bi.abs());
                sum += (ei / scale).powi(2);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            (sum / count as f64).sqrt()
        }
    }

    /// Step size multiplier for an error norm of a method of order `order`.
    pub fn step_factor(&self, norm: f64, order: usize) -> f64 {
        if norm == 0.0 {
            return self.max_factor;
        }
        let exponent = -1.0 / order as f64;
        (self.safety * norm.powf(exponent)).clamp(self.min_factor, self.max_factor)
    }

    /// Step from `t0` to exactly `t_end` with error control.
    ///
    /// `attempt(y, t, h)` returns the candidate solution at `t + h` and its
    /// error norm; `evaluations` is the number of right-hand side
    /// evaluations one attempt costs.
    pub fn drive<S, E, A>(
        &self,
        order: usize,
        evaluations: usize,
        y0: &S,
        t0: f64,
        t_end: f64,
        h0: f64,
        mut attempt: A,
    ) -> Result<(S, AdaptiveStats), StepError<E>>
    where
        S: Integrable,
        A: FnMut(&S, f64, f64) -> Result<(S, f64), StepError<E>>,
    {
        let span = t_end - t0;
        let mut stats = AdaptiveStats {
            next_step: h0.min(self.max_step),
            ..Default::default()
        };
        if span <= 0.0 {
            return Ok((y0.clone(), stats));
        }

        let min_step = self.min_step * span.abs().max(t_end.abs()).max(1.0);
        let mut y = y0.clone();
        let mut t = t0;
        let mut h = stats.next_step.min(span);
        let mut rejections = 0usize;

        while t < t_end {
            let remaining = t_end - t;
            // Absorb a sliver of round-off into the final step
            let landing = h >= remaining || remaining - h < min_step;
            let h_step = if landing { remaining } else { h };
            if h_step < min_step {
                return Err(StepError::divergence(
                    t,
                    format!("step size {:.3e} below minimum {:.3e}", h_step, min_step),
                ));
            }

            let (y_new, norm) = attempt(&y, t, h_step)?;
            stats.rhs_evaluations += evaluations;

            if norm.is_finite() && norm <= 1.0 && y_new.is_finite() {
                y = y_new;
                t = if landing { t_end } else { t + h_step };
                stats.accepted += 1;
                rejections = 0;
                h = (h_step * self.step_factor(norm, order)).min(self.max_step);
                if !landing {
                    stats.next_step = h;
                }
            } else {
                stats.rejected += 1;
                rejections += 1;
                if rejections > self.max_rejections {
                    return Err(StepError::divergence(
                        t,
                        format!("{} consecutive rejected steps", rejections),
                    ));
                }
                let factor = if norm.is_finite() {
                    self.step_factor(norm, order).min(1.0)
                } else {
                    self.min_factor
                };
                h = h_step * factor;
            }
        }

        Ok((y, stats))
    }
}

/// Counters of one adaptive integration call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdaptiveStats {
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evaluations: usize,
    /// Proposed size of the next step.
    pub next_step: f64,
}

// =============================================================================
// Integrator
// =============================================================================

/// Embedded Runge-Kutta integrator with step size control.
#[derive(Clone, Copy, Debug)]
pub struct EmbeddedRungeKutta {
    pub tableau: ButcherTableau,
    pub config: AdaptiveConfig,
}

impl EmbeddedRungeKutta {
    pub fn new(tableau: ButcherTableau, config: AdaptiveConfig) -> Self {
        Self { tableau, config }
    }

    /// Tableau of an explicit scheme, `None` for linearly implicit ones.
    pub fn from_scheme(scheme: AdaptiveScheme, config: AdaptiveConfig) -> Option<Self> {
        let tableau = match scheme {
            AdaptiveScheme::Rk23 => BOGACKI_SHAMPINE,
            AdaptiveScheme::Rk45 => DORMAND_PRINCE,
            AdaptiveScheme::Ros2 => return None,
        };
        Some(Self::new(tableau, config))
    }

    /// One attempted step: the propagated solution and its error norm.
    fn attempt<S, F, E>(&self, y: &S, t: f64, h: f64, rhs: &mut F) -> Result<(S, f64), E>
    where
        S: Integrable,
        F: FnMut(&S, f64) -> Result<S, E>,
    {
        let tab = &self.tableau;
        let mut stages: Vec<S> = Vec::with_capacity(tab.n_stages());
        for (i, (&c, row)) in tab.c.iter().zip(tab.a).enumerate() {
            let mut yi = y.clone();
            for (a, k) in row.iter().zip(&stages[..i]) {
                if *a != 0.0 {
                    yi.axpy(h * a, k);
                }
            }
            stages.push(rhs(&yi, t + c * h)?);
        }

        let mut y_new = y.clone();
        let mut error = y.zeros_like();
        for ((b, b_hat), k) in tab.b.iter().zip(tab.b_hat).zip(&stages) {
            if *b != 0.0 {
                y_new.axpy(h * b, k);
            }
            if b != b_hat {
                error.axpy(h * (b - b_hat), k);
            }
        }
        let norm = self.config.error_norm(&error, y, &y_new);
        Ok((y_new, norm))
    }

    /// Integrate from `t0` to exactly `t_end` starting with step `h0`.
    pub fn integrate<S, F, E>(
        &self,
        y0: &S,
        t0: f64,
        t_end: f64,
        h0: f64,
        mut rhs: F,
    ) -> Result<(S, AdaptiveStats), StepError<E>>
    where
        S: Integrable,
        F: FnMut(&S, f64) -> Result<S, E>,
    {
        self.config.drive(
            self.tableau.order,
            self.tableau.n_stages(),
            y0,
            t0,
            t_end,
            h0,
            |y, t, h| self.attempt(y, t, h, &mut rhs).map_err(StepError::Rhs),
        )
    }
}

impl IntegratorInfo for EmbeddedRungeKutta {
    fn name(&self) -> &'static str {
        self.tableau.name
    }

    fn order(&self) -> usize {
        self.tableau.order
    }

    fn n_stages(&self) -> usize {
        self.tableau.n_stages()
    }

    fn is_adaptive(&self) -> bool {
        true
    }
}

impl<S: Integrable> TimeIntegrator<S> for EmbeddedRungeKutta {
    /// Advance by exactly `dt` with internally controlled sub-steps.
    fn step<F, E>(&self, state: &S, dt: f64, t: f64, rhs: F) -> Result<S, StepError<E>>
    where
        F: FnMut(&S, f64) -> Result<S, E>,
    {
        self.integrate(state, t, t + dt, dt, rhs).map(|(y, _)| y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::State;
    use std::convert::Infallible;

    fn decay(s: &State, _t: f64) -> Result<State, Infallible> {
        let mut rhs = s.clone();
        rhs.scale(-1.0);
        Ok(rhs)
    }

    fn unit_state() -> State {
        State::eqm(0.0, vec![1.0; 2], vec![2.0; 2], vec![0.5; 2])
    }

    #[test]
    fn test_tableaux_are_consistent() {
        for tab in [BOGACKI_SHAMPINE, DORMAND_PRINCE] {
            let b: f64 = tab.b.iter().sum();
            let b_hat: f64 = tab.b_hat.iter().sum();
            assert!((b - 1.0).abs() < 1e-14, "{}", tab.name);
            assert!((b_hat - 1.0).abs() < 1e-14, "{}", tab.name);
            for (row, &c) in tab.a.iter().zip(tab.c) {
                let sum: f64 = row.iter().sum();
                assert!((sum - c).abs() < 1e-14, "{}", tab.name);
            }
        }
    }

    #[test]
    fn test_integrate_lands_on_end_time() {
        for scheme in [AdaptiveScheme::Rk23, AdaptiveScheme::Rk45] {
            let rk = EmbeddedRungeKutta::from_scheme(
                scheme,
                AdaptiveConfig {
                    rtol: 1e-8,
                    atol: 1e-10,
                    ..Default::default()
                },
            )
            .unwrap();
            let (y, stats) = rk.integrate(&unit_state(), 0.0, 1.0, 0.01, decay).unwrap();
            let exact = (-1.0_f64).exp();
            assert!((y.enthalpy[0] - exact).abs() < 1e-6, "{:?}", scheme);
            assert!((y.salt[1] - 2.0 * exact).abs() < 1e-6);
            assert!(stats.accepted > 0);
            assert!(stats.next_step > 0.0);
        }
    }

    #[test]
    fn test_max_step_is_respected() {
        let rk = EmbeddedRungeKutta::from_scheme(
            AdaptiveScheme::Rk23,
            AdaptiveConfig {
                max_step: 0.01,
                ..Default::default()
            },
        )
        .unwrap();
        let (_, stats) = rk.integrate(&unit_state(), 0.0, 0.1, 1.0, decay).unwrap();
        assert!(stats.accepted >= 10);
    }

    #[test]
    fn test_non_finite_rhs_diverges() {
        let rk = EmbeddedRungeKutta::from_scheme(AdaptiveScheme::Rk23, AdaptiveConfig::default())
            .unwrap();
        let result = rk.integrate(&unit_state(), 0.0, 1.0, 0.1, |s: &State, _t| {
            let mut rhs = s.clone();
            rhs.scale(f64::NAN);
            Ok::<_, Infallible>(rhs)
        });
        assert!(matches!(result, Err(StepError::Divergence { .. })));
    }

    #[test]
    fn test_linearly_implicit_scheme_has_no_tableau() {
        assert!(EmbeddedRungeKutta::from_scheme(AdaptiveScheme::Ros2, AdaptiveConfig::default())
            .is_none());
    }

    #[test]
    fn test_time_integrator_step() {
        let rk = EmbeddedRungeKutta::from_scheme(AdaptiveScheme::Rk45, AdaptiveConfig::default())
            .unwrap();
        let y = rk.step(&unit_state(), 0.5, 0.0, decay).unwrap();
        assert!((y.enthalpy[0] - (-0.5_f64).exp()).abs() < 1e-4);
    }
}
