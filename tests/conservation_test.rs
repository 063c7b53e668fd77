//! Conservation of the column integrals.
//!
//! The right-hand side is in flux form, so the column integral of the
//! derivative equals the net boundary flux for any state. With a
//! perturbation far from the boundaries both solvers then keep the
//! integrals of enthalpy, salt and gas constant.

use mushy_rs::analysis::ColumnIntegrals;
use mushy_rs::config::{
    BoundaryConfig, Config, ConstantForcing, ForcingConfig, ModelChoice, NumericalParams,
    OceanForcingConfig, PhysicalParams, SolverChoice,
};
use mushy_rs::solver::State;
use mushy_rs::time::{ForwardEuler, LinearisedBackwardEuler, TimeIntegrator};
use mushy_rs::{Grid, MushyLayerPhysics};

const N_CELLS: usize = 20;

fn closed_column(model: ModelChoice) -> Config {
    Config::new("conservation")
        .with_model(model)
        .with_physical_params(PhysicalParams {
            lewis_salt: 1.0,
            lewis_gas: 1.0,
            ..Default::default()
        })
        .with_numerical_params(NumericalParams {
            n_cells: N_CELLS,
            timestep: 1e-4,
            solver: SolverChoice::Explicit,
            ..Default::default()
        })
        .with_forcing(ForcingConfig::Constant(ConstantForcing {
            constant_top_temperature: 0.1,
        }))
        .with_boundary(BoundaryConfig {
            far_temp: 0.1,
            far_bulk_salinity: 0.0,
            far_gas_sat: 1.0,
            ocean: OceanForcingConfig::FixedTemperature,
        })
}

/// Liquid column in equilibrium with both boundaries, perturbed in the middle.
fn perturbed_state(cfg: &Config) -> State {
    let chi = cfg.physical_params.expansion_coefficient;
    let mut enthalpy = vec![0.1; N_CELLS];
    let mut salt = vec![0.0; N_CELLS];
    let mut gas = vec![chi; N_CELLS];
    for i in 9..11 {
        enthalpy[i] = 0.6;
        salt[i] = 0.05;
        gas[i] = 0.5 * chi;
    }
    match cfg.model {
        ModelChoice::Eqm => State::eqm(0.0, enthalpy, salt, gas),
        ModelChoice::Diseq => State::diseq(0.0, enthalpy, salt, gas, vec![0.0; N_CELLS]),
    }
}

#[test]
fn test_derivative_integral_equals_boundary_flux() {
    let cfg = Config::default().with_numerical_params(NumericalParams {
        n_cells: N_CELLS,
        ..Default::default()
    });
    let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
    let grid = Grid::new(N_CELLS);

    // Mushy top half over liquid, so every flux is active
    let state = State::eqm(
        0.0,
        (0..N_CELLS)
            .map(|i| if i < N_CELLS / 2 { 0.1 } else { -1.2 })
            .collect(),
        vec![0.0; N_CELLS],
        vec![0.02; N_CELLS],
    );
    let evaluation = physics.evaluate(&state, 0.0).unwrap();
    let integrals = ColumnIntegrals::of(&evaluation.derivative, &grid);
    let [heat, salt, gas, _] = evaluation.fluxes.boundary_fluxes();

    for (name, integral, (bottom, top)) in [
        ("enthalpy", integrals.enthalpy, heat),
        ("salt", integrals.salt, salt),
        ("gas", integrals.gas, gas),
    ] {
        let net = bottom - top;
        assert!(
            (integral - net).abs() < 1e-10 * (1.0 + net.abs()),
            "{name}: integral {integral} vs net flux {net}"
        );
    }
}

#[test]
fn test_explicit_solver_conserves_integrals() {
    for model in [ModelChoice::Eqm, ModelChoice::Diseq] {
        let cfg = closed_column(model);
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        let grid = Grid::new(N_CELLS);
        let dt = cfg.numerical_params.timestep;

        let mut state = perturbed_state(&cfg);
        let initial = ColumnIntegrals::of(&state, &grid);
        for n in 0..10 {
            let t = n as f64 * dt;
            state = ForwardEuler
                .step(&state, dt, t, |s: &State, time| {
                    physics.evaluate(s, time).map(|e| e.derivative)
                })
                .unwrap();
        }
        let drift = ColumnIntegrals::of(&state, &grid).max_difference(&initial);
        assert!(drift < 1e-9, "{model:?} explicit drift {drift}");
    }
}

#[test]
fn test_implicit_solver_conserves_integrals() {
    let cfg = closed_column(ModelChoice::Eqm);
    let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
    let grid = Grid::new(N_CELLS);
    let dt = cfg.numerical_params.timestep;

    let mut state = perturbed_state(&cfg);
    let initial = ColumnIntegrals::of(&state, &grid);
    for n in 0..10 {
        let t = n as f64 * dt;
        state = LinearisedBackwardEuler
            .step(&state, dt, t, |s, time| physics.linearise(s, time))
            .unwrap();
    }
    let drift = ColumnIntegrals::of(&state, &grid).max_difference(&initial);
    assert!(drift < 1e-9, "implicit drift {drift}");
}
