//! Exchange between dissolved gas and bubbles in the DISEQ model.
//!
//! Supersaturated brine nucleates bubbles at a rate proportional to the
//! excess dissolved gas; in undersaturated brine bubbles redissolve at a
//! rate proportional to the gas fraction:
//!
//! ```text
//! n = Da (D - χ φl)   if D > χ φl
//! n = -Da φg          otherwise
//! ```
//!
//! Bulk dissolved gas loses `n` and the gas fraction gains it.

use crate::config::PhysicalParams;
use crate::solver::State;

use super::traits::{SourceContext, SourceTerm};

/// Nucleation rate of one cell.
#[inline]
pub fn nucleation_rate(
    dissolved_gas: f64,
    liquid_fraction: f64,
    gas_fraction: f64,
    expansion_coefficient: f64,
    damkohler_number: f64,
) -> f64 {
    let saturation = expansion_coefficient * liquid_fraction;
    if dissolved_gas > saturation {
        damkohler_number * (dissolved_gas - saturation)
    } else {
        -damkohler_number * gas_fraction
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Nucleation {
    expansion_coefficient: f64,
    damkohler_number: f64,
}

impl Nucleation {
    pub fn new(params: &PhysicalParams) -> Self {
        Self {
            expansion_coefficient: params.expansion_coefficient,
            damkohler_number: params.damkohler_number,
        }
    }
}

impl SourceTerm for Nucleation {
    fn evaluate(&self, ctx: &SourceContext<'_>) -> State {
        let state = &ctx.full.state;
        let phase = &ctx.full.phase;
        let mut out = state.zeros_with_shape();
        // EQM states have no separate gas fraction to exchange with
        if out.gas_fraction.is_empty() {
            return out;
        }
        for i in 0..state.n_cells() {
            let n = nucleation_rate(
                state.gas[i],
                phase.liquid_fraction[i],
                state.gas_fraction[i],
                self.expansion_coefficient,
                self.damkohler_number,
            );
            out.gas[i] = -n;
            out.gas_fraction[i] = n;
        }
        out
    }

    fn name(&self) -> &'static str {
        "nucleation"
    }
}
