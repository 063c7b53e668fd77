//! Brine convection parameterisation settings.

use serde::{Deserialize, Serialize};

/// Rees Jones & Worster (2014) brine channel parameterisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rjw14Params {
    /// Haline Rayleigh number Ra_S.
    /// default: 44105
    pub rayleigh_salt: f64,

    /// Critical Rayleigh number for the onset of convection.
    /// default: 40
    pub rayleigh_critical: f64,

    /// Tuning constant α scaling the brine flux.
    /// default: 0.03
    pub convection_strength: f64,

    /// Carry bubbles out through the brine channels with the sink term.
    /// default: false
    pub couple_bubble_to_horizontal_flow: bool,

    /// Advect bubbles with the upward return flow.
    /// default: false
    pub couple_bubble_to_vertical_flow: bool,
}

impl Default for Rjw14Params {
    fn default() -> Self {
        Self {
            rayleigh_salt: 44105.0,
            rayleigh_critical: 40.0,
            convection_strength: 0.03,
            couple_bubble_to_horizontal_flow: false,
            couple_bubble_to_vertical_flow: false,
        }
    }
}

/// Brine convection option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrineConvectionParams {
    /// No brine convection.
    #[default]
    #[serde(alias = "no_brine_convection")]
    None,
    /// Rees Jones & Worster (2014).
    #[serde(rename = "rjw14")]
    Rjw14(Rjw14Params),
}

impl BrineConvectionParams {
    /// Parameters of the active parameterisation, if any.
    pub fn rjw14(&self) -> Option<&Rjw14Params> {
        match self {
            BrineConvectionParams::None => None,
            BrineConvectionParams::Rjw14(params) => Some(params),
        }
    }
}
