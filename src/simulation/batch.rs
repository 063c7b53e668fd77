//! Batches of independent runs.
//!
//! A failing configuration is logged and reported in its [`RunOutcome`];
//! it never stops the remaining runs. With the `parallel` feature the
//! runs are spread over the Rayon thread pool.

use tracing::{error, info};

use crate::config::Config;

use super::error::SimulationError;
use super::runner::{Simulation, SimulationConfig, SimulationResult};

/// Outcome of one configuration of a batch.
#[derive(Debug)]
pub struct RunOutcome {
    pub name: String,
    pub result: Result<SimulationResult, SimulationError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Build and run one configuration.
pub fn run_one(cfg: &Config, options: &SimulationConfig) -> RunOutcome {
    let result = Simulation::new(cfg.clone())
        .map(|sim| sim.with_options(options.clone()))
        .and_then(|mut sim| sim.run());
    match &result {
        Ok(run) => info!(name = %cfg.name, steps = run.n_steps, "Run succeeded"),
        Err(err) => error!(name = %cfg.name, error = %err, "Run crashed"),
    }
    RunOutcome {
        name: cfg.name.clone(),
        result,
    }
}

/// Run every configuration, in input order.
#[cfg(not(feature = "parallel"))]
pub fn run_batch(configs: &[Config], options: &SimulationConfig) -> Vec<RunOutcome> {
    configs.iter().map(|cfg| run_one(cfg, options)).collect()
}

/// Run every configuration in parallel. Outcomes keep the input order.
#[cfg(feature = "parallel")]
pub fn run_batch(configs: &[Config], options: &SimulationConfig) -> Vec<RunOutcome> {
    use rayon::prelude::*;

    configs
        .par_iter()
        .map(|cfg| run_one(cfg, options))
        .collect()
}

/// Number of failed runs in a batch.
pub fn count_failures(outcomes: &[RunOutcome]) -> usize {
    outcomes.iter().filter(|o| !o.is_success()).count()
}
