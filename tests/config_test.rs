//! Configuration files and the dimensional front end.

use mushy_rs::config::{
    BrineConvectionParams, BubbleDistribution, Config, ConfigError, DimensionalBrineConvection,
    DimensionalBubbleDistribution, DimensionalForcing, DimensionalOceanForcing, DimensionalParams,
    DimensionalRjw14Params, ForcingConfig, ModelChoice, NumericalParams, OceanForcingConfig,
    SolverChoice,
};
use mushy_rs::io::{read_solution, write_solution};
use mushy_rs::simulation::{SimulationConfig, count_failures, run_batch};
use tempfile::tempdir;

fn field_params() -> DimensionalParams {
    DimensionalParams {
        name: "field".to_string(),
        model: ModelChoice::Diseq,
        total_time_in_days: 20.0,
        savefreq_in_days: 0.5,
        far_temp: -1.2,
        ocean: DimensionalOceanForcing::FixedHeatFlux { heat_flux: 5.0 },
        forcing: DimensionalForcing::Constant {
            constant_top_temperature: -18.0,
        },
        bubble_distribution: DimensionalBubbleDistribution::PowerLaw {
            bubble_distribution_power: 1.5,
            minimum_bubble_radius: 1e-5,
            maximum_bubble_radius: 2e-3,
        },
        brine_convection: DimensionalBrineConvection::Rjw14(DimensionalRjw14Params::default()),
        ..Default::default()
    }
}

#[test]
fn test_dimensional_values_survive_conversion() {
    let params = field_params();
    let cfg = params.to_config();
    let scales = cfg.scales.clone().unwrap();
    let close = |a: f64, b: f64| (a - b).abs() < 1e-10 * b.abs().max(1.0);

    assert!(close(
        scales.convert_to_dimensional_time(cfg.total_time),
        params.total_time_in_days
    ));
    assert!(close(
        scales.convert_to_dimensional_time(cfg.savefreq),
        params.savefreq_in_days
    ));
    assert!(close(
        scales.convert_to_dimensional_temperature(cfg.boundary_config.far_temp),
        params.far_temp
    ));
    assert!(close(
        scales.convert_to_dimensional_bulk_salinity(cfg.boundary_config.far_bulk_salinity),
        params.far_bulk_salinity
    ));
    assert!(close(
        scales.convert_to_dimensional_dissolved_gas(cfg.boundary_config.far_gas_sat),
        params.far_gas_sat
    ));
    match &cfg.boundary_config.ocean {
        OceanForcingConfig::FixedHeatFlux { heat_flux } => {
            assert!(close(scales.convert_to_dimensional_heat_flux(*heat_flux), 5.0))
        }
        other => panic!("unexpected ocean forcing {other:?}"),
    }
    match &cfg.forcing_config {
        ForcingConfig::Constant(constant) => assert!(close(
            scales.convert_to_dimensional_temperature(constant.constant_top_temperature),
            -18.0
        )),
        other => panic!("unexpected forcing {other:?}"),
    }
    match &cfg.bubble_params.distribution {
        BubbleDistribution::PowerLaw(law) => {
            assert!(close(law.minimum_bubble_radius_scaled * params.pore_radius, 1e-5));
            assert!(close(law.maximum_bubble_radius_scaled * params.pore_radius, 2e-3));
        }
        other => panic!("unexpected distribution {other:?}"),
    }
    assert!(matches!(
        cfg.brine_convection,
        BrineConvectionParams::Rjw14(ref rjw14) if rjw14.rayleigh_salt > 0.0
    ));
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_yaml_files_round_trip() {
    let dir = tempdir().unwrap();

    let params = field_params();
    let path = params.save(dir.path()).unwrap();
    assert!(path.ends_with("field_dimensional.yml"));
    assert_eq!(DimensionalParams::load(&path).unwrap(), params);

    let cfg = params.to_config();
    let path = cfg.save(dir.path()).unwrap();
    assert!(path.ends_with("field.yml"));
    assert_eq!(Config::load(&path).unwrap(), cfg);
}

#[test]
fn test_partial_yaml_uses_defaults() {
    let text = "name: partial\nmodel: DISEQ\nnumerical_params:\n  I: 12\n  solver: implicit\n";
    let cfg: Config = serde_yaml::from_str(text).unwrap();
    assert_eq!(cfg.model, ModelChoice::Diseq);
    assert_eq!(cfg.numerical_params.n_cells, 12);
    assert_eq!(cfg.numerical_params.solver, SolverChoice::Implicit);
    assert_eq!(cfg.total_time, Config::default().total_time);
    assert!(cfg.validate().is_ok());

    let unknown = "name: typo\ntotal_tme: 3.0\n";
    assert!(serde_yaml::from_str::<Config>(unknown).is_err());
}

#[test]
fn test_mixed_parameters_rejected_before_running() {
    let cfg = Config::new("mixed").with_numerical_params(NumericalParams {
        n_cells: 0,
        ..Default::default()
    });
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidParameter { name: "I", .. })
    ));

    let cfg = Config::new("reanalysis").with_forcing(ForcingConfig::Reanalysis(Default::default()));
    assert!(matches!(cfg.validate(), Err(ConfigError::MissingScales(_))));
}

#[test]
fn test_batch_writes_loadable_solutions() {
    let dir = tempdir().unwrap();
    let short = |name: &str, solver| {
        Config::new(name)
            .with_times(0.02, 0.01)
            .with_numerical_params(NumericalParams {
                n_cells: 8,
                timestep: 1e-3,
                solver,
                ..Default::default()
            })
    };
    let configs = vec![
        short("explicit", SolverChoice::Explicit),
        short("implicit", SolverChoice::Implicit),
        Config::new("broken").with_times(1.0, 2.0),
    ];

    let outcomes = run_batch(&configs, &SimulationConfig::default());
    assert_eq!(outcomes.len(), 3);
    assert_eq!(count_failures(&outcomes), 1);
    assert_eq!(outcomes[2].name, "broken");

    for outcome in outcomes.iter().filter(|o| o.is_success()) {
        let result = outcome.result.as_ref().unwrap();
        let path = write_solution(&result.solution, &outcome.name, dir.path()).unwrap();
        let loaded = read_solution(&path).unwrap();
        assert_eq!(loaded, result.solution);
        assert_eq!(loaded.n_times(), 3);
    }
}
