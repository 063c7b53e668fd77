//! Phase fractions over a sweep of prime variables for every enthalpy method.

use mushy_rs::config::PhysicalParams;
use mushy_rs::enthalpy::{
    CellPhase, DisequilibriumEnthalpy, EnthalpyMethod, FullEnthalpy, ReducedEnthalpy,
};
use mushy_rs::solver::PrimeCell;

const FRACTION_TOL: f64 = 1e-10;

fn enthalpy_sweep() -> impl Iterator<Item = f64> {
    (0..=26).map(|k| -6.0 + 0.25 * k as f64)
}

fn assert_consistent(method: &str, prime: PrimeCell, phase: CellPhase) {
    let sum = phase.solid_fraction + phase.liquid_fraction + phase.gas_fraction;
    assert!(
        (sum - 1.0).abs() < FRACTION_TOL,
        "{method}: fractions sum to {sum} for {prime:?}"
    );
    for (name, value) in [
        ("solid", phase.solid_fraction),
        ("liquid", phase.liquid_fraction),
        ("gas", phase.gas_fraction),
    ] {
        assert!(
            (-FRACTION_TOL..=1.0 + FRACTION_TOL).contains(&value),
            "{method}: {name} fraction {value} for {prime:?}"
        );
    }
    assert!(phase.temperature.is_finite());
}

#[test]
fn test_equilibrium_methods_partition_volume() {
    let params = PhysicalParams::default();
    let chi = params.expansion_coefficient;
    let methods: [(&str, Box<dyn EnthalpyMethod>); 2] = [
        ("reduced", Box::new(ReducedEnthalpy::new(params.clone()))),
        ("full", Box::new(FullEnthalpy::new(params.clone()))),
    ];

    for (name, method) in &methods {
        for enthalpy in enthalpy_sweep() {
            for salt in [-0.05, 0.0, 0.05, 0.2] {
                for gas in [0.0, 0.5 * chi, chi, 2.0 * chi] {
                    let prime = PrimeCell {
                        enthalpy,
                        salt,
                        gas,
                        gas_fraction: 0.0,
                    };
                    let phase = method.solve_cell(0, prime).unwrap();
                    assert_consistent(name, prime, phase);
                }
            }
        }
    }
}

#[test]
fn test_disequilibrium_partitions_volume() {
    let params = PhysicalParams::default();
    let chi = params.expansion_coefficient;
    let method = DisequilibriumEnthalpy::new(params);

    for enthalpy in enthalpy_sweep() {
        for salt in [-0.05, 0.0, 0.05, 0.2] {
            for gas_fraction in [0.0, 1e-3, 0.02] {
                let prime = PrimeCell {
                    enthalpy,
                    salt,
                    gas: 0.5 * chi,
                    gas_fraction,
                };
                let phase = method.solve_cell(0, prime).unwrap();
                assert_consistent("diseq", prime, phase);
                assert_eq!(phase.gas_fraction, gas_fraction);
            }
        }
    }
}

#[test]
fn test_temperature_continuous_in_enthalpy() {
    let params = PhysicalParams::default();
    let method = ReducedEnthalpy::new(params);
    let delta = 1e-9;

    for salt in [0.0, 0.1] {
        let mut h = -6.0;
        while h < 0.5 {
            let at = |enthalpy| {
                method
                    .solve_cell(
                        0,
                        PrimeCell {
                            enthalpy,
                            salt,
                            gas: 0.0,
                            gas_fraction: 0.0,
                        },
                    )
                    .unwrap()
                    .temperature
            };
            let jump = (at(h + delta) - at(h)).abs();
            assert!(jump < 1e-6, "temperature jumps by {jump} at H={h}, S={salt}");
            h += 0.01;
        }
    }
}
