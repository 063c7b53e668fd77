//! Core solution containers.
//!
//! - [`SolutionRecorder`]: append-only archive filled during a run
//! - [`Solution`]: immutable (time × space) tables of the prime variables

mod solution;

pub use solution::{FieldTable, Solution, SolutionRecorder};
