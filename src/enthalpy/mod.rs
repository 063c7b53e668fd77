//! Enthalpy methods: phase state from the prime variables.
//!
//! Given enthalpy, bulk salinity and the gas variables of each cell, an
//! enthalpy method returns solid, liquid and gas fractions, temperature,
//! liquid (brine) salinity and dissolved gas. Every variant uses closed
//! forms per thermodynamic region, so no root finding is needed.
//!
//! Variants:
//! - [`ReducedEnthalpy`]: gas decoupled from the energy balance (EQM)
//! - [`FullEnthalpy`]: gas volume shifts the phase boundaries (EQM)
//! - [`DisequilibriumEnthalpy`]: bubbles as a separate prime variable (DISEQ)

mod disequilibrium;
mod full;
pub mod phase_boundaries;
mod reduced;

pub use disequilibrium::DisequilibriumEnthalpy;
pub use full::FullEnthalpy;
pub use phase_boundaries::{PhaseRegime, PhaseRegion};
pub use reduced::ReducedEnthalpy;

use thiserror::Error;

use crate::config::{Config, EnthalpyMethodChoice, ModelChoice};
use crate::solver::{PrimeCell, State};

/// Allowed deviation of the phase fractions from [0, 1] and from summing to one.
pub const FRACTION_TOLERANCE: f64 = 1e-10;

/// Failure to compute a consistent phase state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PhaseSolveError {
    #[error("Non-finite prime variables in cell {cell}: H={enthalpy}, S={salt}, G={gas}")]
    NonFiniteInput {
        cell: usize,
        enthalpy: f64,
        salt: f64,
        gas: f64,
    },

    #[error("Negative mush discriminant {discriminant} in cell {cell} (H={enthalpy}, S={salt})")]
    NegativeDiscriminant {
        cell: usize,
        enthalpy: f64,
        salt: f64,
        discriminant: f64,
    },

    #[error("{name} = {value} outside [0, 1] in cell {cell}")]
    FractionOutOfRange {
        cell: usize,
        name: &'static str,
        value: f64,
    },

    #[error("Phase fractions sum to {sum} in cell {cell}")]
    FractionSum { cell: usize, sum: f64 },
}

/// Phase state of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellPhase {
    pub solid_fraction: f64,
    pub liquid_fraction: f64,
    pub gas_fraction: f64,
    pub temperature: f64,
    pub liquid_salinity: f64,
    /// Dissolved gas concentration relative to saturation
    pub dissolved_gas: f64,
}

impl CellPhase {
    /// Check fractions against [0, 1] and the sum-to-one constraint, then
    /// clamp round-off.
    pub fn checked(mut self, cell: usize) -> Result<Self, PhaseSolveError> {
        let fractions = [
            ("solid_fraction", self.solid_fraction),
            ("liquid_fraction", self.liquid_fraction),
            ("gas_fraction", self.gas_fraction),
        ];
        for (name, value) in fractions {
            if !(-FRACTION_TOLERANCE..=1.0 + FRACTION_TOLERANCE).contains(&value) {
                return Err(PhaseSolveError::FractionOutOfRange { cell, name, value });
            }
        }
        let sum = self.solid_fraction + self.liquid_fraction + self.gas_fraction;
        if (sum - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(PhaseSolveError::FractionSum { cell, sum });
        }
        self.solid_fraction = self.solid_fraction.clamp(0.0, 1.0);
        self.liquid_fraction = self.liquid_fraction.clamp(0.0, 1.0);
        self.gas_fraction = self.gas_fraction.clamp(0.0, 1.0);
        Ok(self)
    }
}

/// Phase state on cell centers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhaseProfile {
    pub solid_fraction: Vec<f64>,
    pub liquid_fraction: Vec<f64>,
    pub gas_fraction: Vec<f64>,
    pub temperature: Vec<f64>,
    pub liquid_salinity: Vec<f64>,
    pub dissolved_gas: Vec<f64>,
}

impl PhaseProfile {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            solid_fraction: Vec::with_capacity(n),
            liquid_fraction: Vec::with_capacity(n),
            gas_fraction: Vec::with_capacity(n),
            temperature: Vec::with_capacity(n),
            liquid_salinity: Vec::with_capacity(n),
            dissolved_gas: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, cell: CellPhase) {
        self.solid_fraction.push(cell.solid_fraction);
        self.liquid_fraction.push(cell.liquid_fraction);
        self.gas_fraction.push(cell.gas_fraction);
        self.temperature.push(cell.temperature);
        self.liquid_salinity.push(cell.liquid_salinity);
        self.dissolved_gas.push(cell.dissolved_gas);
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

// =============================================================================
// EnthalpyMethod Trait
// =============================================================================

/// Closed-form phase solve for one model variant.
pub trait EnthalpyMethod: Send + Sync {
    fn name(&self) -> &'static str;

    /// Phase state of a single cell. `cell` is only used for error reports.
    fn solve_cell(&self, cell: usize, prime: PrimeCell) -> Result<CellPhase, PhaseSolveError>;

    /// Phase state of every cell of `state`.
    fn solve(&self, state: &State) -> Result<PhaseProfile, PhaseSolveError> {
        let mut profile = PhaseProfile::with_capacity(state.n_cells());
        for i in 0..state.n_cells() {
            let prime = state.cell(i);
            if !(prime.enthalpy.is_finite()
                && prime.salt.is_finite()
                && prime.gas.is_finite()
                && prime.gas_fraction.is_finite())
            {
                return Err(PhaseSolveError::NonFiniteInput {
                    cell: i,
                    enthalpy: prime.enthalpy,
                    salt: prime.salt,
                    gas: prime.gas,
                });
            }
            profile.push(self.solve_cell(i, prime)?.checked(i)?);
        }
        Ok(profile)
    }

    /// Local dT/dH at fixed salinity and gas, used to linearise conduction.
    ///
    /// Default is a centred finite difference.
    fn temperature_derivative(&self, prime: PrimeCell) -> f64 {
        const DELTA: f64 = 1e-7;
        let temperature_at = |h: f64| {
            self.solve_cell(
                0,
                PrimeCell {
                    enthalpy: h,
                    ..prime
                },
            )
            .map(|phase| phase.temperature)
        };
        match (
            temperature_at(prime.enthalpy + DELTA),
            temperature_at(prime.enthalpy - DELTA),
        ) {
            (Ok(upper), Ok(lower)) => (upper - lower) / (2.0 * DELTA),
            _ => 1.0,
        }
    }
}

// =============================================================================
// Runtime selection
// =============================================================================

/// Enthalpy method selected from the configuration.
#[derive(Clone, Debug)]
pub enum EnthalpyMethodKind {
    Reduced(ReducedEnthalpy),
    Full(FullEnthalpy),
    Disequilibrium(DisequilibriumEnthalpy),
}

impl EnthalpyMethodKind {
    pub fn from_config(cfg: &Config) -> Self {
        let params = cfg.physical_params.clone();
        match (cfg.model, cfg.enthalpy_method) {
            (ModelChoice::Diseq, _) => {
                EnthalpyMethodKind::Disequilibrium(DisequilibriumEnthalpy::new(params))
            }
            (ModelChoice::Eqm, EnthalpyMethodChoice::Reduced) => {
                EnthalpyMethodKind::Reduced(ReducedEnthalpy::new(params))
            }
            (ModelChoice::Eqm, EnthalpyMethodChoice::Full) => {
                EnthalpyMethodKind::Full(FullEnthalpy::new(params))
            }
        }
    }
}

impl EnthalpyMethod for EnthalpyMethodKind {
    fn name(&self) -> &'static str {
        match self {
            EnthalpyMethodKind::Reduced(m) => m.name(),
            EnthalpyMethodKind::Full(m) => m.name(),
            EnthalpyMethodKind::Disequilibrium(m) => m.name(),
        }
    }

    fn solve_cell(&self, cell: usize, prime: PrimeCell) -> Result<CellPhase, PhaseSolveError> {
        match self {
            EnthalpyMethodKind::Reduced(m) => m.solve_cell(cell, prime),
            EnthalpyMethodKind::Full(m) => m.solve_cell(cell, prime),
            EnthalpyMethodKind::Disequilibrium(m) => m.solve_cell(cell, prime),
        }
    }

    fn temperature_derivative(&self, prime: PrimeCell) -> f64 {
        match self {
            EnthalpyMethodKind::Reduced(m) => m.temperature_derivative(prime),
            EnthalpyMethodKind::Full(m) => m.temperature_derivative(prime),
            EnthalpyMethodKind::Disequilibrium(m) => m.temperature_derivative(prime),
        }
    }
}
