//! Source term trait and composition.

use crate::mesh::Grid;
use crate::solver::{State, StateBCs, StateFull};

use super::brine_convection::BrineChannelFlow;

/// Everything a source term may depend on at one RHS evaluation.
#[derive(Clone, Copy, Debug)]
pub struct SourceContext<'a> {
    pub time: f64,
    pub grid: &'a Grid,
    pub full: &'a StateFull,
    pub bcs: &'a StateBCs,
    /// Drainage flow, when brine convection is active
    pub brine_flow: Option<&'a BrineChannelFlow>,
}

/// Trait for volumetric source terms.
///
/// Source terms add to the time derivative of the prime variables:
/// dq/dt = -∂F/∂z + S(q, z, t)
pub trait SourceTerm: Send + Sync {
    /// Contribution to the time derivative, shaped like the prime state.
    fn evaluate(&self, ctx: &SourceContext<'_>) -> State;

    /// Name of this source term for debugging.
    fn name(&self) -> &'static str;
}

/// Sum of several source terms.
#[derive(Default)]
pub struct CombinedSource {
    sources: Vec<Box<dyn SourceTerm>>,
}

impl CombinedSource {
    pub fn new(sources: Vec<Box<dyn SourceTerm>>) -> Self {
        Self { sources }
    }

    pub fn push(&mut self, source: Box<dyn SourceTerm>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl SourceTerm for CombinedSource {
    fn evaluate(&self, ctx: &SourceContext<'_>) -> State {
        let mut total = ctx.full.state.zeros_with_shape();
        for source in &self.sources {
            total.axpy(1.0, &source.evaluate(ctx));
        }
        total
    }

    fn name(&self) -> &'static str {
        "combined"
    }
}

impl std::fmt::Debug for CombinedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedSource")
            .field("sources", &self.names())
            .finish()
    }
}
