//! Gauss-Legendre nodes and weights.
//!
//! The n nodes are the roots of P_n(x) on (-1, 1), found by Newton iteration
//! from the Chebyshev guess `cos(π (j + 3/4) / (n + 1/2))`. An n point rule
//! integrates polynomials up to degree 2n-1 exactly.

use std::f64::consts::PI;

/// Evaluate P_n(x) and P'_n(x) with the three-term recurrence
/// `(k+1) P_{k+1} = (2k+1) x P_k - k P_{k-1}`.
///
/// Only valid for |x| < 1, which holds for every Newton iterate below.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }
    let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, dp)
}

/// Gauss-Legendre rule on [-1, 1].
#[derive(Clone, Debug)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Rule with `n_points` nodes.
    pub fn new(n_points: usize) -> Self {
        assert!(n_points > 0, "Need at least one quadrature point");

        let n = n_points;
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];

        // Roots are symmetric, so only the upper half is iterated
        for j in 0..n.div_ceil(2) {
            let mut x = (PI * (j as f64 + 0.75) / (n as f64 + 0.5)).cos();
            for _ in 0..100 {
                let (p, dp) = legendre_and_derivative(n, x);
                let update = p / dp;
                x -= update;
                if update.abs() < 1e-15 {
                    break;
                }
            }
            let (_, dp) = legendre_and_derivative(n, x);
            let w = 2.0 / ((1.0 - x * x) * dp * dp);

            nodes[j] = -x;
            nodes[n - 1 - j] = x;
            weights[j] = w;
            weights[n - 1 - j] = w;
        }

        Self { nodes, weights }
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn n_points(&self) -> usize {
        self.nodes.len()
    }

    /// Approximate `∫_a^b f(x) dx`.
    pub fn integrate<F: Fn(f64) -> f64>(&self, a: f64, b: f64, f: F) -> f64 {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        half * self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(mid + half * x))
            .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_are_roots() {
        for n in 1..=12 {
            let rule = GaussLegendre::new(n);
            for &x in rule.nodes() {
                let (p, _) = legendre_and_derivative(n, x);
                assert!(p.abs() < 1e-13, "P_{}({}) = {}", n, x, p);
            }
        }
    }

    #[test]
    fn test_nodes_sorted_and_symmetric() {
        let rule = GaussLegendre::new(7);
        assert!(rule.nodes().windows(2).all(|w| w[1] > w[0]));
        assert!(rule.nodes()[3].abs() < 1e-15);
        for i in 0..3 {
            assert!((rule.nodes()[i] + rule.nodes()[6 - i]).abs() < 1e-14);
            assert!((rule.weights()[i] - rule.weights()[6 - i]).abs() < 1e-14);
        }
    }

    #[test]
    fn test_weights_sum() {
        for n in 1..=12 {
            let sum: f64 = GaussLegendre::new(n).weights().iter().sum();
            assert!((sum - 2.0).abs() < 1e-13, "Weights sum to {} for n={}", sum, n);
        }
    }

    #[test]
    fn test_polynomial_exactness() {
        // n points integrate x^k exactly for k <= 2n-1
        for n in 1..=6 {
            let rule = GaussLegendre::new(n);
            for k in 0..2 * n {
                let numeric = rule.integrate(0.0, 2.0, |x| x.powi(k as i32));
                let exact = 2.0_f64.powi(k as i32 + 1) / (k + 1) as f64;
                assert!(
                    (numeric - exact).abs() < 1e-11 * exact.max(1.0),
                    "n={}, k={}: {} vs {}",
                    n,
                    k,
                    numeric,
                    exact
                );
            }
        }
    }
}
