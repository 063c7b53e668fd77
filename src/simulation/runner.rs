//! Simulation runner implementation.
//!
//! A run moves through `Initialized → Stepping → {Completed | Failed}`.
//! The state is archived at every save time `k * savefreq`; each solver
//! lands exactly on the save times rather than interpolating to them.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::analysis::{StabilityMonitor, StabilityThresholds, StabilityWarning};
use crate::config::{Config, SolverChoice};
use crate::physics::{MushyLayerPhysics, PhysicsModule, PhysicsModuleInfo, RhsError};
use crate::solver::{Solution, SolutionRecorder, State};
use crate::time::{
    AdaptiveConfig, AdaptiveStats, EmbeddedRungeKutta, ForwardEuler, IntegratorInfo,
    LinearisedBackwardEuler, Ros2, StepError, TimeIntegrator,
};

use super::error::SimulationError;
use super::initial_conditions::initial_state;

/// Fraction of `step²` used as the largest explicit adaptive step.
pub const ADAPTIVE_MAX_STEP_FACTOR: f64 = 0.1;

/// Fraction of `step` used as the largest linearly implicit adaptive step.
pub const ROS2_MAX_STEP_FACTOR: f64 = 0.5;

/// Relative tolerance for having reached a save time.
const TIME_TOLERANCE: f64 = 1e-12;

// =============================================================================
// Simulation Configuration
// =============================================================================

/// Options of the runner that are not part of the model configuration.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Maximum number of time steps (or accepted adaptive sub-steps).
    pub max_steps: Option<usize>,
    /// Thresholds for the explicit stability checks.
    pub stability: StabilityThresholds,
    /// Report progress at `info` instead of `debug` level.
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            stability: StabilityThresholds::default(),
            verbose: false,
        }
    }
}

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Initialized,
    Stepping,
    Completed,
    Failed,
}

// =============================================================================
// Simulation Result
// =============================================================================

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    pub name: String,
    /// Name of the time integrator used.
    pub integrator: &'static str,
    pub solution: Solution,
    /// Final simulation time reached.
    pub final_time: f64,
    /// Total number of (accepted) time steps taken.
    pub n_steps: usize,
    /// Rejected adaptive steps.
    pub n_rejected: usize,
    /// Minimum time step used.
    pub dt_min: f64,
    /// Maximum time step used.
    pub dt_max: f64,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
    /// Distinct stability warnings raised during the run.
    pub warnings: Vec<StabilityWarning>,
}

/// Step statistics accumulated while stepping.
#[derive(Clone, Debug)]
struct StepLog {
    n_steps: usize,
    n_rejected: usize,
    dt_min: f64,
    dt_max: f64,
    warnings: Vec<StabilityWarning>,
}

impl Default for StepLog {
    fn default() -> Self {
        Self {
            n_steps: 0,
            n_rejected: 0,
            dt_min: f64::INFINITY,
            dt_max: 0.0,
            warnings: Vec::new(),
        }
    }
}

impl StepLog {
    fn record_step(&mut self, dt: f64) {
        self.n_steps += 1;
        self.dt_min = self.dt_min.min(dt);
        self.dt_max = self.dt_max.max(dt);
    }
}

fn reached(time: f64, target: f64) -> bool {
    target - time <= TIME_TOLERANCE * target.abs().max(1.0)
}

// =============================================================================
// Simulation Runner
// =============================================================================

/// One run of the mushy layer model.
pub struct Simulation {
    cfg: Arc<Config>,
    physics: MushyLayerPhysics,
    config: SimulationConfig,
    status: RunStatus,
}

impl Simulation {
    /// Validate the configuration and build the physics.
    pub fn new(cfg: Config) -> Result<Self, SimulationError> {
        Self::from_shared(Arc::new(cfg))
    }

    pub fn from_shared(cfg: Arc<Config>) -> Result<Self, SimulationError> {
        cfg.validate()?;
        let physics = MushyLayerPhysics::from_config(&cfg)?;
        Ok(Self {
            cfg,
            physics,
            config: SimulationConfig::default(),
            status: RunStatus::Initialized,
        })
    }

    /// Replace the runner options.
    pub fn with_options(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum number of steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.config.max_steps = Some(max_steps);
        self
    }

    /// Enable verbose output.
    pub fn verbose(mut self) -> Self {
        self.config.verbose = true;
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn physics(&self) -> &MushyLayerPhysics {
        &self.physics
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Initial state from the configured initial condition.
    pub fn initial_state(&self) -> Result<State, SimulationError> {
        Ok(initial_state(&self.cfg, self.physics.grid())?)
    }

    /// Run from the configured initial condition to `total_time`.
    pub fn run(&mut self) -> Result<SimulationResult, SimulationError> {
        let initial = match self.initial_state() {
            Ok(state) => state,
            Err(err) => {
                self.status = RunStatus::Failed;
                error!(name = %self.cfg.name, error = %err, "Run failed");
                return Err(err);
            }
        };
        self.run_from(initial)
    }

    /// Run from a given initial state at t = 0.
    pub fn run_from(&mut self, initial: State) -> Result<SimulationResult, SimulationError> {
        let start_wall = Instant::now();
        let numerical = &self.cfg.numerical_params;
        let integrator = self.integrator_name();
        info!(
            name = %self.cfg.name,
            physics = self.physics.description(),
            solver = integrator,
            cells = numerical.n_cells,
            total_time = self.cfg.total_time,
            "Starting run"
        );

        self.status = RunStatus::Stepping;
        let mut recorder = SolutionRecorder::new(
            self.cfg.model,
            numerical.n_cells,
            self.cfg.save_times(),
        );
        let mut log = StepLog::default();

        let outcome = SimulationError::check_finite(&initial).and_then(|()| {
            let mut state = initial;
            state.time = 0.0;
            recorder.record(&state);
            match numerical.solver {
                SolverChoice::Explicit => self.run_explicit(state, &mut recorder, &mut log),
                SolverChoice::Implicit => self.run_implicit(state, &mut recorder, &mut log),
                SolverChoice::Adaptive => self.run_adaptive(state, &mut recorder, &mut log),
            }
        });

        let final_state = match outcome {
            Ok(state) => state,
            Err(err) => {
                self.status = RunStatus::Failed;
                error!(
                    name = %self.cfg.name,
                    saved = recorder.n_recorded(),
                    error = %err,
                    "Run failed"
                );
                return Err(err);
            }
        };

        self.status = RunStatus::Completed;
        let wall_time = start_wall.elapsed().as_secs_f64();
        info!(
            name = %self.cfg.name,
            steps = log.n_steps,
            rejected = log.n_rejected,
            wall_time,
            "Run complete"
        );

        Ok(SimulationResult {
            name: self.cfg.name.clone(),
            integrator,
            solution: recorder.finish(),
            final_time: final_state.time,
            n_steps: log.n_steps,
            n_rejected: log.n_rejected,
            dt_min: log.dt_min,
            dt_max: log.dt_max,
            wall_time,
            warnings: log.warnings,
        })
    }

    fn integrator_name(&self) -> &'static str {
        match self.cfg.numerical_params.solver {
            SolverChoice::Explicit => ForwardEuler.name(),
            SolverChoice::Implicit => LinearisedBackwardEuler.name(),
            SolverChoice::Adaptive => self.adaptive_integrator().name(),
        }
    }

    fn adaptive_integrator(&self) -> AdaptiveIntegrator {
        let numerical = &self.cfg.numerical_params;
        let step = self.physics.grid().step();
        let config = AdaptiveConfig {
            rtol: numerical.rtol,
            atol: numerical.atol,
            max_step: ADAPTIVE_MAX_STEP_FACTOR * step * step,
            ..Default::default()
        };
        match EmbeddedRungeKutta::from_scheme(numerical.adaptive_scheme, config) {
            Some(rk) => AdaptiveIntegrator::RungeKutta(rk),
            None => AdaptiveIntegrator::Rosenbrock(Ros2::new(AdaptiveConfig {
                max_step: ROS2_MAX_STEP_FACTOR * step,
                ..config
            })),
        }
    }

    fn check_step_limit(&self, log: &StepLog) -> Result<(), SimulationError> {
        match self.config.max_steps {
            Some(max_steps) if log.n_steps >= max_steps => {
                Err(SimulationError::StepLimit(max_steps))
            }
            _ => Ok(()),
        }
    }

    fn report_save(&self, state: &State, recorder: &SolutionRecorder, log: &StepLog) {
        let n_saves = recorder.save_times().len();
        let saved = recorder.n_recorded();
        if self.config.verbose {
            info!(time = state.time, saved, n_saves, steps = log.n_steps, "Saved state");
        } else {
            debug!(time = state.time, saved, n_saves, steps = log.n_steps, "Saved state");
        }
    }

    fn warn_once(&self, log: &mut StepLog, warning: StabilityWarning) {
        let seen = log
            .warnings
            .iter()
            .any(|w| std::mem::discriminant(w) == std::mem::discriminant(&warning));
        if !seen {
            warn!(name = %self.cfg.name, "{}", warning);
            log.warnings.push(warning);
        }
    }

    /// Forward Euler, with the stable timestep when adaptive stepping is on.
    fn run_explicit(
        &self,
        mut state: State,
        recorder: &mut SolutionRecorder,
        log: &mut StepLog,
    ) -> Result<State, SimulationError> {
        let numerical = &self.cfg.numerical_params;
        let step = self.physics.grid().step();
        let monitor = StabilityMonitor::new(self.config.stability);

        while let Some(target) = recorder.next_save_time() {
            while !reached(state.time, target) {
                self.check_step_limit(log)?;
                let t = state.time;
                let evaluation = self.physics.evaluate(&state, t)?;

                let mut dt = numerical.timestep;
                if numerical.adaptive_timestepping {
                    dt = dt.min(self.physics.stable_timestep(&evaluation));
                }
                let landing = t + dt >= target;
                if landing {
                    dt = target - t;
                }

                // The first call returns the derivative already evaluated
                let mut derivative = Some(evaluation.derivative);
                let mut next = ForwardEuler
                    .step(&state, dt, t, |s: &State, time| match derivative.take() {
                        Some(d) => Ok(d),
                        None => self.physics.compute_rhs(s, time),
                    })
                    .map_err(|e| SimulationError::from_step(e, &state))?;
                next.time = if landing { target } else { t + dt };
                self.physics.post_process(&mut next);

                let status = monitor.check(&next, dt, step);
                for warning in status.warnings {
                    match warning {
                        StabilityWarning::NonFiniteValue { time, field, cell } => {
                            return Err(SimulationError::NonFinite { time, field, cell });
                        }
                        // A save-time landing step is shorter and not representative
                        StabilityWarning::CourantExceeded { .. } if !landing => {
                            self.warn_once(log, warning)
                        }
                        StabilityWarning::CourantExceeded { .. } => {}
                    }
                }

                log.record_step(dt);
                state = next;
            }
            recorder.record(&state);
            self.report_save(&state, recorder, log);
        }
        Ok(state)
    }

    /// Linearised backward Euler on conduction with the configured timestep.
    fn run_implicit(
        &self,
        mut state: State,
        recorder: &mut SolutionRecorder,
        log: &mut StepLog,
    ) -> Result<State, SimulationError> {
        let timestep = self.cfg.numerical_params.timestep;

        while let Some(target) = recorder.next_save_time() {
            while !reached(state.time, target) {
                self.check_step_limit(log)?;
                let t = state.time;
                let landing = t + timestep >= target;
                let dt = if landing { target - t } else { timestep };

                let mut next = LinearisedBackwardEuler
                    .step(&state, dt, t, |s: &State, time| self.physics.linearise(s, time))
                    .map_err(|e| SimulationError::from_step(e, &state))?;
                next.time = if landing { target } else { t + dt };
                self.physics.post_process(&mut next);
                SimulationError::check_finite(&next)?;

                log.record_step(dt);
                state = next;
            }
            recorder.record(&state);
            self.report_save(&state, recorder, log);
        }
        Ok(state)
    }

    /// Embedded Runge-Kutta from one save time to the next.
    fn run_adaptive(
        &self,
        mut state: State,
        recorder: &mut SolutionRecorder,
        log: &mut StepLog,
    ) -> Result<State, SimulationError> {
        let integrator = self.adaptive_integrator();
        let mut h = self
            .cfg
            .numerical_params
            .timestep
            .min(integrator.max_step());

        while let Some(target) = recorder.next_save_time() {
            if !reached(state.time, target) {
                self.check_step_limit(log)?;
                let t = state.time;
                let (mut next, stats) = integrator
                    .integrate(&self.physics, &state, t, target, h)
                    .map_err(|e| SimulationError::from_step(e, &state))?;
                next.time = target;
                self.physics.post_process(&mut next);
                SimulationError::check_finite(&next)?;

                log.n_steps += stats.accepted;
                log.n_rejected += stats.rejected;
                if stats.accepted > 0 {
                    let mean_dt = (target - t) / stats.accepted as f64;
                    log.dt_min = log.dt_min.min(mean_dt);
                    log.dt_max = log.dt_max.max(mean_dt);
                }
                h = stats.next_step;
                state = next;
            }
            recorder.record(&state);
            self.report_save(&state, recorder, log);
        }
        Ok(state)
    }
}

/// Adaptive integrator selected by the configured scheme.
#[derive(Clone, Copy, Debug)]
enum AdaptiveIntegrator {
    RungeKutta(EmbeddedRungeKutta),
    Rosenbrock(Ros2),
}

impl AdaptiveIntegrator {
    fn name(&self) -> &'static str {
        match self {
            Self::RungeKutta(rk) => rk.name(),
            Self::Rosenbrock(ros2) => ros2.name(),
        }
    }

    fn max_step(&self) -> f64 {
        match self {
            Self::RungeKutta(rk) => rk.config.max_step,
            Self::Rosenbrock(ros2) => ros2.config.max_step,
        }
    }

    fn integrate(
        &self,
        physics: &MushyLayerPhysics,
        state: &State,
        t: f64,
        target: f64,
        h: f64,
    ) -> Result<(State, AdaptiveStats), StepError<RhsError>> {
        match self {
            Self::RungeKutta(rk) => {
                rk.integrate(state, t, target, h, |s: &State, time| physics.compute_rhs(s, time))
            }
            Self::Rosenbrock(ros2) => {
                ros2.integrate(state, t, target, h, |s: &State, time| physics.linearise(s, time))
            }
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("name", &self.cfg.name)
            .field("physics", &self.physics)
            .field("config", &self.config)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdaptiveScheme, ConstantForcing, ForcingConfig, NumericalParams};

    fn small_config(solver: SolverChoice) -> Config {
        Config::new("runner")
            .with_times(0.02, 0.01)
            .with_forcing(ForcingConfig::Constant(ConstantForcing {
                constant_top_temperature: -1.5,
            }))
            .with_numerical_params(NumericalParams {
                n_cells: 10,
                timestep: 1e-3,
                solver,
                ..Default::default()
            })
    }

    #[test]
    fn test_status_transitions() {
        let mut sim = Simulation::new(small_config(SolverChoice::Explicit)).unwrap();
        assert_eq!(sim.status(), RunStatus::Initialized);
        let result = sim.run().unwrap();
        assert_eq!(sim.status(), RunStatus::Completed);
        assert_eq!(result.solution.n_times(), 3);
        assert!((result.final_time - 0.02).abs() < 1e-15);
        assert_eq!(result.solution.times, vec![0.0, 0.01, 0.02]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = small_config(SolverChoice::Explicit).with_times(0.01, 0.02);
        assert!(matches!(
            Simulation::new(cfg),
            Err(SimulationError::Configuration(_))
        ));
    }

    #[test]
    fn test_courant_warning_recorded_once() {
        // dt / step² = 6e-3 / 1e-2 = 0.6
        let mut cfg = small_config(SolverChoice::Explicit);
        cfg.numerical_params.timestep = 6e-3;
        let mut sim = Simulation::new(cfg).unwrap();
        match sim.run() {
            Ok(result) => {
                assert_eq!(result.warnings.len(), 1);
                assert!(matches!(
                    result.warnings[0],
                    StabilityWarning::CourantExceeded { .. }
                ));
            }
            Err(err) => assert!(matches!(err, SimulationError::NonFinite { .. })),
        }
    }

    #[test]
    fn test_step_limit_fails_run() {
        let mut sim = Simulation::new(small_config(SolverChoice::Implicit))
            .unwrap()
            .with_max_steps(3);
        assert!(matches!(sim.run(), Err(SimulationError::StepLimit(3))));
        assert_eq!(sim.status(), RunStatus::Failed);
    }

    #[test]
    fn test_adaptive_lands_on_save_times() {
        let mut sim = Simulation::new(small_config(SolverChoice::Adaptive)).unwrap();
        let result = sim.run().unwrap();
        assert_eq!(result.integrator, "rk23");
        assert_eq!(result.solution.n_times(), 3);
        assert!(result.n_steps > 0);
        assert!(result.dt_max <= ADAPTIVE_MAX_STEP_FACTOR * 0.01 + 1e-15);
    }

    #[test]
    fn test_rosenbrock_takes_longer_steps() {
        let mut cfg = small_config(SolverChoice::Adaptive);
        cfg.numerical_params.adaptive_scheme = AdaptiveScheme::Ros2;
        let result = Simulation::new(cfg).unwrap().run().unwrap();
        assert_eq!(result.integrator, "ros2");
        assert_eq!(result.solution.times, vec![0.0, 0.01, 0.02]);
        assert!(result.dt_max <= ROS2_MAX_STEP_FACTOR * 0.1 + 1e-15);
        assert!(result.dt_max > ADAPTIVE_MAX_STEP_FACTOR * 0.01);
    }
}
