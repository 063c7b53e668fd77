//! Run diagnostics.
//!
//! This module provides tools for:
//! - Monitoring the explicit scheme for Courant-limit violations and
//!   non-finite values
//! - Depth integrals of the prime variables, used to check conservation
//! - Ice depth and phase summaries of archived solutions

mod diagnostics;
mod stability;

pub use diagnostics::{ColumnIntegrals, SaveDiagnostics, ice_depth, summarise};
pub use stability::{
    StabilityMonitor, StabilityStatus, StabilityThresholds, StabilityWarning, courant_warning,
};
