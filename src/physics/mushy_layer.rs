//! Right-hand side of the mushy layer equations.
//!
//! One evaluation runs the full pipeline of the model:
//!
//! ```text
//! State ─enthalpy method─▶ StateFull ─boundary─▶ StateBCs
//!       ─closures─▶ EdgeVelocities ─fluxes─▶ EdgeFluxes
//!       ─▶ dq/dt = -∂F/∂z + sources
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::boundary::{BoundaryConditions, ForcingSetupError};
use crate::closures::{EdgeVelocities, VelocityClosure, eddy_diffusivity};
use crate::config::{Config, ForcingConfig, ModelChoice, PhysicalParams, Rjw14Params};
use crate::enthalpy::{EnthalpyMethod, EnthalpyMethodKind, PhaseSolveError};
use crate::flux::{EdgeFluxes, TransportFluxes};
use crate::io::ForcingLookupError;
use crate::mesh::{Grid, geometric};
use crate::solver::{State, StateBCs, StateFull};
use crate::source::{
    BrineChannelFlow, BrineChannelSink, CombinedSource, DrainageError, Nucleation,
    RadiativeHeating, SourceContext, SourceTerm,
};
use crate::time::{LinearisedRhs, Tridiagonal};

use super::traits::{PhysicsModule, PhysicsModuleInfo};

/// Failure to evaluate the right-hand side.
#[derive(Debug, Error)]
pub enum RhsError {
    #[error(transparent)]
    PhaseSolve(#[from] PhaseSolveError),

    #[error(transparent)]
    ForcingLookup(#[from] ForcingLookupError),

    #[error(transparent)]
    Drainage(#[from] DrainageError),
}

/// Everything computed during one right-hand side evaluation.
#[derive(Clone, Debug)]
pub struct RhsEvaluation {
    pub full: StateFull,
    pub bcs: StateBCs,
    pub brine_flow: Option<BrineChannelFlow>,
    pub velocities: EdgeVelocities,
    pub fluxes: EdgeFluxes,
    /// Time derivative of the prime variables.
    pub derivative: State,
}

/// Brine drainage settings of a run.
#[derive(Clone, Debug)]
struct BrineDrainage {
    params: Rjw14Params,
    threshold: Option<f64>,
}

/// Mushy layer physics module.
pub struct MushyLayerPhysics {
    grid: Arc<Grid>,
    model: ModelChoice,
    params: PhysicalParams,
    enthalpy: EnthalpyMethodKind,
    boundary: BoundaryConditions,
    velocities: VelocityClosure,
    transport: TransportFluxes,
    drainage: Option<BrineDrainage>,
    sources: CombinedSource,
}

impl MushyLayerPhysics {
    pub fn from_config(cfg: &Config) -> Result<Self, ForcingSetupError> {
        let grid = Arc::new(Grid::new(cfg.numerical_params.n_cells));
        Self::with_grid(cfg, grid)
    }

    /// Build on a shared grid.
    pub fn with_grid(cfg: &Config, grid: Arc<Grid>) -> Result<Self, ForcingSetupError> {
        let params = cfg.physical_params.clone();
        let velocities = VelocityClosure::from_config(cfg);
        let threshold = cfg
            .bubble_params
            .porosity_threshold
            .then_some(cfg.bubble_params.porosity_threshold_value);

        let mut sources = CombinedSource::default();
        let drainage = cfg.brine_convection.rjw14().map(|rjw14| {
            sources.push(Box::new(BrineChannelSink::new(
                &params,
                rjw14,
                velocities.bubble().clone(),
            )));
            BrineDrainage {
                params: rjw14.clone(),
                threshold,
            }
        });
        if cfg.model == ModelChoice::Diseq {
            sources.push(Box::new(Nucleation::new(&params)));
        }
        if let (ForcingConfig::Radiative(radiative), Some(scales)) =
            (&cfg.forcing_config, &cfg.scales)
        {
            if radiative.sw_internal_heating {
                sources.push(Box::new(RadiativeHeating::from_forcing(
                    radiative,
                    scales.clone(),
                )));
            }
        }

        Ok(Self {
            grid,
            model: cfg.model,
            enthalpy: EnthalpyMethodKind::from_config(cfg),
            boundary: BoundaryConditions::from_config(cfg)?,
            transport: TransportFluxes::new(&params),
            velocities,
            drainage,
            sources,
            params,
        })
    }

    pub fn model(&self) -> ModelChoice {
        self.model
    }

    pub fn enthalpy_method(&self) -> &EnthalpyMethodKind {
        &self.enthalpy
    }

    pub fn boundary_conditions(&self) -> &BoundaryConditions {
        &self.boundary
    }

    pub fn transport(&self) -> &TransportFluxes {
        &self.transport
    }

    pub fn sources(&self) -> &CombinedSource {
        &self.sources
    }

    /// Phase state of `state`.
    pub fn full_state(&self, state: &State) -> Result<StateFull, PhaseSolveError> {
        StateFull::from_state(state.clone(), &self.enthalpy)
    }

    /// Run the whole pipeline at time `time`.
    pub fn evaluate(&self, state: &State, time: f64) -> Result<RhsEvaluation, RhsError> {
        let mut at_time = state.clone();
        at_time.time = time;
        let full = StateFull::from_state(at_time, &self.enthalpy)?;
        let bcs = self.boundary.apply(&full)?;
        let grid = self.grid.as_ref();

        let brine_flow = self
            .drainage
            .as_ref()
            .map(|d| {
                BrineChannelFlow::compute(
                    grid,
                    &full.phase.solid_fraction,
                    &full.phase.liquid_salinity,
                    &d.params,
                    d.threshold,
                )
            })
            .transpose()?;

        let velocities = self.velocities.compute(
            &bcs,
            brine_flow.as_ref().map(|f| f.edge_velocity.as_slice()),
        );
        let fluxes = self.transport.compute(self.model, grid, &bcs, &velocities);

        let mut derivative = full.state.zeros_with_shape();
        derivative.enthalpy = negative_divergence(grid, &fluxes.heat);
        derivative.salt = negative_divergence(grid, &fluxes.salt);
        derivative.gas = negative_divergence(grid, &fluxes.gas);
        if self.model == ModelChoice::Diseq {
            derivative.gas_fraction = negative_divergence(grid, &fluxes.gas_fraction);
        }

        if !self.sources.is_empty() {
            let ctx = SourceContext {
                time,
                grid,
                full: &full,
                bcs: &bcs,
                brine_flow: brine_flow.as_ref(),
            };
            derivative.axpy(1.0, &self.sources.evaluate(&ctx));
        }

        Ok(RhsEvaluation {
            full,
            bcs,
            brine_flow,
            velocities,
            fluxes,
            derivative,
        })
    }

    /// Right-hand side with the linearised conduction operator, for the
    /// implicit solver.
    pub fn linearise(&self, state: &State, time: f64) -> Result<LinearisedRhs, RhsError> {
        let evaluation = self.evaluate(state, time)?;
        let conduction = self.conduction_operator(state, &evaluation.bcs);
        Ok(LinearisedRhs {
            derivative: evaluation.derivative,
            conduction,
        })
    }

    /// Discrete `∂/∂z (k_e ∂T/∂z)` acting on enthalpy increments through
    /// the local dT/dH. Ghost temperatures are held fixed.
    pub fn conduction_operator(&self, state: &State, bcs: &StateBCs) -> Tridiagonal {
        let n = state.n_cells();
        let inv_step2 = 1.0 / self.grid.step().powi(2);
        let k = self.transport.effective_conductivity(bcs);
        let slope: Vec<f64> = (0..n)
            .map(|i| self.enthalpy.temperature_derivative(state.cell(i)))
            .collect();

        let mut lower = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut upper = vec![0.0; n];
        for i in 0..n {
            let (below, above) = (k[i], k[i + 1]);
            diag[i] = -(below + above) * inv_step2 * slope[i];
            if i > 0 {
                lower[i] = below * inv_step2 * slope[i - 1];
            }
            if i + 1 < n {
                upper[i] = above * inv_step2 * slope[i + 1];
            }
        }
        Tridiagonal::new(lower, diag, upper)
    }

    /// Explicit stability bound of an evaluated state:
    /// `min(0.5 step² / D_max, step / |v|_max)`.
    pub fn stable_timestep(&self, evaluation: &RhsEvaluation) -> f64 {
        let step = self.grid.step();
        let bcs = &evaluation.bcs;
        let params = &self.params;
        let solute = params.salt_diffusivity().max(params.gas_diffusivity());
        let diffusivity = self
            .transport
            .effective_conductivity(bcs)
            .into_iter()
            .zip(geometric(&bcs.liquid_fraction))
            .map(|(k, phi)| {
                let eddy = eddy_diffusivity(phi, params.eddy_diffusivity_ratio);
                k.max(phi * (solute + eddy))
            })
            .fold(0.0_f64, f64::max);
        let speed = evaluation.velocities.max_speed();

        let mut dt = f64::INFINITY;
        if diffusivity > 0.0 {
            dt = dt.min(0.5 * step * step / diffusivity);
        }
        if speed > 0.0 {
            dt = dt.min(step / speed);
        }
        dt
    }
}

/// `-D_e F`: minus the divergence of edge fluxes on cell centers.
fn negative_divergence(grid: &Grid, flux: &[f64]) -> Vec<f64> {
    grid.diff_edges(flux).into_iter().map(|d| -d).collect()
}

impl PhysicsModuleInfo for MushyLayerPhysics {
    fn name(&self) -> &'static str {
        "mushy-layer"
    }

    fn description(&self) -> &str {
        match self.model {
            ModelChoice::Eqm => "Mushy layer with equilibrium gas",
            ModelChoice::Diseq => "Mushy layer with bubble nucleation",
        }
    }

    fn n_variables(&self) -> usize {
        self.variable_names().len()
    }

    fn variable_names(&self) -> &[&'static str] {
        match self.model {
            ModelChoice::Eqm => &["enthalpy", "salt", "gas"],
            ModelChoice::Diseq => &["enthalpy", "salt", "dissolved_gas", "gas_fraction"],
        }
    }
}

impl PhysicsModule<State> for MushyLayerPhysics {
    type Error = RhsError;

    fn compute_rhs(&self, state: &State, time: f64) -> Result<State, RhsError> {
        self.evaluate(state, time).map(|e| e.derivative)
    }

    fn compute_dt(&self, state: &State, max_dt: f64) -> Result<f64, RhsError> {
        let evaluation = self.evaluate(state, state.time)?;
        Ok(self.stable_timestep(&evaluation).min(max_dt))
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl std::fmt::Debug for MushyLayerPhysics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MushyLayerPhysics")
            .field("n_cells", &self.grid.n_cells())
            .field("model", &self.model)
            .field("enthalpy", &self.enthalpy.name())
            .field("surface", &self.boundary.surface().name())
            .field("ocean", &self.boundary.ocean().name())
            .field("sources", &self.sources.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BoundaryConfig, BrineConvectionParams, BubbleParams, ConstantForcing, NumericalParams,
        OceanForcingConfig,
    };
    use crate::solver::PrimeCell;

    fn liquid_config(n: usize) -> Config {
        Config::new("rhs")
            .with_numerical_params(NumericalParams {
                n_cells: n,
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

    fn uniform_liquid(cfg: &Config) -> State {
        let chi = cfg.physical_params.expansion_coefficient;
        State::uniform(
            cfg.model,
            cfg.numerical_params.n_cells,
            PrimeCell {
                enthalpy: 0.1,
                salt: 0.0,
                gas: chi,
                gas_fraction: 0.0,
            },
        )
    }

    #[test]
    fn test_equilibrium_state_is_steady() {
        let cfg = liquid_config(8);
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        let rhs = physics.compute_rhs(&uniform_liquid(&cfg), 0.0).unwrap();
        assert!(rhs.max_abs() < 1e-12, "max |rhs| = {}", rhs.max_abs());
    }

    #[test]
    fn test_cold_surface_cools_top_cell() {
        let cfg = liquid_config(8).with_forcing(ForcingConfig::Constant(ConstantForcing {
            constant_top_temperature: -1.5,
        }));
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        let rhs = physics.compute_rhs(&uniform_liquid(&cfg), 0.0).unwrap();
        assert!(rhs.enthalpy[7] < 0.0);
        assert!(rhs.enthalpy[..7].iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn test_conduction_operator_matches_rhs_for_linear_temperature() {
        // In liquid dT/dH = 1, so A applied to H equals the interior conduction
        let cfg = liquid_config(6);
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        let mut state = uniform_liquid(&cfg);
        state.enthalpy = vec![0.1, 0.3, 0.2, 0.5, 0.4, 0.1];
        let evaluation = physics.evaluate(&state, 0.0).unwrap();
        let op = physics.conduction_operator(&state, &evaluation.bcs);
        assert!(op.diag.iter().all(|&d| d < 0.0));

        let applied = op.apply(&state.enthalpy);
        // Interior rows see no ghost contribution
        for i in 1..5 {
            assert!((applied[i] - evaluation.derivative.enthalpy[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sources_follow_configuration() {
        let cfg = liquid_config(4);
        assert!(MushyLayerPhysics::from_config(&cfg).unwrap().sources().is_empty());

        let cfg = liquid_config(4)
            .with_model(ModelChoice::Diseq)
            .with_brine_convection(BrineConvectionParams::Rjw14(Rjw14Params::default()));
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        assert_eq!(physics.sources().names(), vec!["brine_channel_sink", "nucleation"]);
        assert_eq!(physics.n_variables(), 4);
    }

    #[test]
    fn test_bubbles_in_liquid_column_are_not_ice() {
        let cfg = liquid_config(10)
            .with_model(ModelChoice::Diseq)
            .with_brine_convection(BrineConvectionParams::Rjw14(Rjw14Params::default()));
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        let chi = cfg.physical_params.expansion_coefficient;
        let mut state = State::uniform(
            ModelChoice::Diseq,
            10,
            PrimeCell {
                enthalpy: 0.1,
                salt: 0.0,
                gas: 0.5 * chi,
                gas_fraction: 0.0,
            },
        );
        state.gas_fraction[0] = 0.05;

        let evaluation = physics.evaluate(&state, 0.0).unwrap();
        assert_eq!(evaluation.full.phase.solid_fraction[0], 0.0);
        assert!(evaluation.full.phase.liquid_fraction[0] < 1.0);
        let flow = evaluation.brine_flow.unwrap();
        assert_eq!(flow.ice_depth, 0.0);
        assert!(!flow.is_active());
    }

    #[test]
    fn test_ocean_heat_flux_is_delivered_through_eddy_conductivity() {
        let cfg = liquid_config(8)
            .with_physical_params(PhysicalParams {
                eddy_diffusivity_ratio: 10.0,
                ..Default::default()
            })
            .with_boundary(BoundaryConfig {
                far_temp: 0.1,
                far_bulk_salinity: 0.0,
                far_gas_sat: 1.0,
                ocean: OceanForcingConfig::FixedHeatFlux { heat_flux: 0.5 },
            });
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        let evaluation = physics.evaluate(&uniform_liquid(&cfg), 0.0).unwrap();
        assert!((evaluation.fluxes.heat[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_stable_timestep_is_diffusive_limit() {
        let cfg = liquid_config(10).with_bubble_params(BubbleParams {
            buoyancy: 0.0,
            ..Default::default()
        });
        let physics = MushyLayerPhysics::from_config(&cfg).unwrap();
        let dt = physics.compute_dt(&uniform_liquid(&cfg), 1.0).unwrap();
        assert!((dt - 0.5 * 0.01).abs() < 1e-12);
    }
}
