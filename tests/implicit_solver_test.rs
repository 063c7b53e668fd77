//! Thomas algorithm checked against a dense LU solve.

use faer::{Mat, linalg::solvers::Solve};
use mushy_rs::config::{Config, NumericalParams};
use mushy_rs::solver::State;
use mushy_rs::time::{LinearisedBackwardEuler, Tridiagonal};
use mushy_rs::MushyLayerPhysics;

/// Dense solve of `m x = rhs`.
fn dense_solve(m: &Tridiagonal, rhs: &[f64]) -> Vec<f64> {
    let n = m.len();
    let mut a = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        a[(i, i)] = m.diag[i];
        if i > 0 {
            a[(i, i - 1)] = m.lower[i];
        }
        if i + 1 < n {
            a[(i, i + 1)] = m.upper[i];
        }
    }
    let mut b = Mat::<f64>::zeros(n, 1);
    for (i, &r) in rhs.iter().enumerate() {
        b[(i, 0)] = r;
    }
    let lu = a.as_ref().full_piv_lu();
    let x = lu.solve(&b);
    (0..n).map(|i| x[(i, 0)]).collect()
}

fn max_difference(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0_f64, |acc, (x, y)| acc.max((x - y).abs()))
}

#[test]
fn test_thomas_matches_dense_lu() {
    let n = 40;
    // Diagonally dominant with varying coefficients
    let lower: Vec<f64> = (0..n).map(|i| -0.3 - 0.01 * i as f64).collect();
    let upper: Vec<f64> = (0..n).map(|i| -0.5 + 0.005 * i as f64).collect();
    let diag: Vec<f64> = (0..n).map(|i| 2.0 + (i as f64 * 0.7).sin()).collect();
    let rhs: Vec<f64> = (0..n).map(|i| (i as f64 * 0.3).cos()).collect();
    let m = Tridiagonal::new(lower, diag, upper);

    let thomas = m.solve(&rhs).unwrap();
    let dense = dense_solve(&m, &rhs);
    assert!(max_difference(&thomas, &dense) < 1e-12);
    assert!(max_difference(&m.apply(&thomas), &rhs) < 1e-12);
}

#[test]
fn test_backward_euler_system_matches_dense_lu() {
    let n = 16;
    let cfg = Config::default().with_numerical_params(NumericalParams {
        n_cells: n,
        ..Default::default()
    });
    let physics = MushyLayerPhysics::from_config(&cfg).unwrap();

    // Liquid below a mushy top
    let enthalpy: Vec<f64> = (0..n)
        .map(|i| 0.1 - 2.0 * (i as f64 / n as f64).powi(2))
        .collect();
    let state = State::eqm(0.0, enthalpy, vec![0.0; n], vec![0.01; n]);
    let dt = 1e-3;

    let linearised = physics.linearise(&state, 0.0).unwrap();
    let op = &linearised.conduction;
    let system = Tridiagonal::new(
        op.lower.iter().map(|a| -dt * a).collect(),
        op.diag.iter().map(|a| 1.0 - dt * a).collect(),
        op.upper.iter().map(|a| -dt * a).collect(),
    );
    let rhs: Vec<f64> = linearised.derivative.enthalpy.iter().map(|r| dt * r).collect();
    let delta = dense_solve(&system, &rhs);

    let next = LinearisedBackwardEuler
        .step(&state, dt, 0.0, |s, t| physics.linearise(s, t))
        .unwrap();
    let stepped: Vec<f64> = next
        .enthalpy
        .iter()
        .zip(&state.enthalpy)
        .map(|(h1, h0)| h1 - h0)
        .collect();
    assert!(max_difference(&stepped, &delta) < 1e-12);
}

#[test]
fn test_singular_pivot_is_reported() {
    let m = Tridiagonal::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]);
    assert!(m.solve(&[1.0, 1.0]).is_err());
}
