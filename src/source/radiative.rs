//! Internal heating of the ice by penetrating shortwave radiation.
//!
//! A [`ShortwaveModel`] receives the ice part of the column in physical
//! units and returns absorbed power per unit volume in each cell. The
//! built-in [`TwoBandBeerLambert`] splits the penetrating irradiance at a
//! cutoff wavelength into a visible band, attenuated over metres, and an
//! infrared band absorbed within centimetres of the surface. Absorption in
//! a cell is the divergence of the downwelling irradiance across it, so
//! the column absorbs exactly what enters it minus what leaves the base.

use crate::config::{RadiativeForcing, Scales};
use crate::solver::State;

use super::brine_convection::ice_ocean_boundary_depth;
use super::traits::{SourceContext, SourceTerm};

/// Ice part of the column seen by a shortwave model, ordered from the
/// surface downward.
#[derive(Clone, Copy, Debug)]
pub struct ShortwaveColumn<'a> {
    /// Cell thickness (m)
    pub cell_thickness: f64,
    pub liquid_fraction: &'a [f64],
    pub gas_fraction: &'a [f64],
    /// Ice thickness (m)
    pub ice_thickness: f64,
    /// Shortwave irradiance entering the ice below the surface layer (W/m²)
    pub irradiance: f64,
}

impl ShortwaveColumn<'_> {
    pub fn n_cells(&self) -> usize {
        self.liquid_fraction.len()
    }
}

/// Radiative transfer collaborator.
pub trait ShortwaveModel: Send + Sync {
    /// Absorbed power (W/m³) in each cell of the column, surface first.
    fn absorption(&self, column: &ShortwaveColumn<'_>) -> Vec<f64>;

    fn name(&self) -> &'static str;
}

/// Cumulative fraction of surface solar irradiance below a wavelength (nm),
/// normalised over 350-3000 nm.
const SOLAR_CUMULATIVE: [(f64, f64); 10] = [
    (350.0, 0.0),
    (400.0, 0.04),
    (500.0, 0.19),
    (600.0, 0.35),
    (700.0, 0.49),
    (800.0, 0.60),
    (1000.0, 0.74),
    (1500.0, 0.91),
    (2000.0, 0.97),
    (3000.0, 1.0),
];

/// Fraction of the solar spectrum shorter than `wavelength`.
pub fn solar_fraction_below(wavelength: f64) -> f64 {
    let (first_wl, first_f) = SOLAR_CUMULATIVE[0];
    if wavelength <= first_wl {
        return first_f;
    }
    for pair in SOLAR_CUMULATIVE.windows(2) {
        let (w0, f0) = pair[0];
        let (w1, f1) = pair[1];
        if wavelength <= w1 {
            return f0 + (f1 - f0) * (wavelength - w0) / (w1 - w0);
        }
    }
    1.0
}

/// Extinction of visible light in bubble-free ice (1/m).
pub const ICE_VISIBLE_EXTINCTION: f64 = 1.5;
/// Extinction of visible light in brine (1/m).
pub const BRINE_VISIBLE_EXTINCTION: f64 = 0.1;
/// Additional visible extinction per unit gas fraction from bubble scattering (1/m).
pub const BUBBLE_VISIBLE_EXTINCTION: f64 = 50.0;
/// Extinction of the infrared band (1/m).
pub const INFRARED_EXTINCTION: f64 = 30.0;

/// Two-band exponential attenuation.
#[derive(Clone, Copy, Debug)]
pub struct TwoBandBeerLambert {
    /// Fraction of penetrating irradiance in the visible band
    pub visible_fraction: f64,
    /// Deposit the whole infrared band in the top cell
    pub fast: bool,
}

impl TwoBandBeerLambert {
    pub fn new(cutoff_wavelength: f64, fast: bool) -> Self {
        Self {
            visible_fraction: solar_fraction_below(cutoff_wavelength),
            fast,
        }
    }

    fn visible_extinction(liquid_fraction: f64, gas_fraction: f64) -> f64 {
        let solid = (1.0 - liquid_fraction - gas_fraction).max(0.0);
        ICE_VISIBLE_EXTINCTION * solid
            + BRINE_VISIBLE_EXTINCTION * liquid_fraction
            + BUBBLE_VISIBLE_EXTINCTION * gas_fraction
    }
}

impl ShortwaveModel for TwoBandBeerLambert {
    fn absorption(&self, column: &ShortwaveColumn<'_>) -> Vec<f64> {
        let n = column.n_cells();
        let dz = column.cell_thickness;
        let mut visible = column.irradiance * self.visible_fraction;
        let mut infrared = column.irradiance * (1.0 - self.visible_fraction);

        let mut absorbed = Vec::with_capacity(n);
        for i in 0..n {
            let kappa =
                Self::visible_extinction(column.liquid_fraction[i], column.gas_fraction[i]);
            let visible_out = visible * (-kappa * dz).exp();
            let infrared_out = if self.fast {
                0.0
            } else {
                infrared * (-INFRARED_EXTINCTION * dz).exp()
            };
            absorbed.push((visible - visible_out + infrared - infrared_out) / dz);
            visible = visible_out;
            infrared = infrared_out;
        }
        absorbed
    }

    fn name(&self) -> &'static str {
        "two_band_beer_lambert"
    }
}

/// Shortwave heating source in the enthalpy equation.
pub struct RadiativeHeating {
    model: Box<dyn ShortwaveModel>,
    scales: Scales,
    /// Irradiance transmitted below the surface layer (W/m²)
    penetrating_irradiance: f64,
}

impl RadiativeHeating {
    pub fn new(model: Box<dyn ShortwaveModel>, forcing: &RadiativeForcing, scales: Scales) -> Self {
        let penetrating_irradiance = forcing.constant_sw_irradiance
            * (1.0 - forcing.sw_albedo)
            * forcing.sw_penetration_fraction;
        Self {
            model,
            scales,
            penetrating_irradiance,
        }
    }

    /// Built-in two band model configured from the forcing.
    pub fn from_forcing(forcing: &RadiativeForcing, scales: Scales) -> Self {
        let model = TwoBandBeerLambert::new(forcing.cutoff_wavelength, forcing.fast_radiative_transfer);
        Self::new(Box::new(model), forcing, scales)
    }

    /// Non-dimensional heating on cell centers (bottom first).
    pub fn heating(
        &self,
        step: f64,
        edges: &[f64],
        solid_fraction: &[f64],
        liquid_fraction: &[f64],
        gas_fraction: &[f64],
    ) -> Vec<f64> {
        let n = liquid_fraction.len();
        let mut heating = vec![0.0; n];
        // A column frozen to the bottom is ice throughout
        let ice_depth = ice_ocean_boundary_depth(solid_fraction, edges).unwrap_or(1.0);
        let n_ice = ((ice_depth / step).round() as usize).min(n);
        if n_ice == 0 {
            return heating;
        }

        // Surface first
        let liquid: Vec<f64> = liquid_fraction.iter().rev().take(n_ice).copied().collect();
        let gas: Vec<f64> = gas_fraction.iter().rev().take(n_ice).copied().collect();
        let column = ShortwaveColumn {
            cell_thickness: self.scales.convert_to_dimensional_grid(step),
            liquid_fraction: &liquid,
            gas_fraction: &gas,
            ice_thickness: self.scales.convert_to_dimensional_grid(ice_depth),
            irradiance: self.penetrating_irradiance,
        };
        let absorbed = self.model.absorption(&column);
        for (k, power) in absorbed.into_iter().take(n_ice).enumerate() {
            heating[n - 1 - k] = self.scales.convert_from_dimensional_heating(power);
        }
        heating
    }
}

impl SourceTerm for RadiativeHeating {
    fn evaluate(&self, ctx: &SourceContext<'_>) -> State {
        let mut out = ctx.full.state.zeros_with_shape();
        out.enthalpy = self.heating(
            ctx.grid.step(),
            ctx.grid.edges(),
            &ctx.full.phase.solid_fraction,
            &ctx.full.phase.liquid_fraction,
            &ctx.full.phase.gas_fraction,
        );
        out
    }

    fn name(&self) -> &'static str {
        "radiative_heating"
    }
}

impl std::fmt::Debug for RadiativeHeating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadiativeHeating")
            .field("model", &self.model.name())
            .field("penetrating_irradiance", &self.penetrating_irradiance)
            .finish()
    }
}
