//! Dimensional parameter sets and conversion scales.
//!
//! [`DimensionalParams`] holds physical properties in SI units (with times in
//! days and temperatures in °C) and derives the non-dimensional numbers of a
//! [`Config`]. [`Scales`] carries the subset needed to convert simulation
//! output back to physical units.
//!
//! Non-dimensionalisation:
//! - temperature: `(T - T_i) / ΔT` with `T_i` the ocean freezing temperature
//! - bulk salinity: `(S - S_i) / ΔS`
//! - bulk gas: `G / ρ_g`, dissolved gas: `ξ / ξ_sat`
//! - depth: `z / L`, time: `t / (L² / κ)`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    BoundaryConfig, BrineConvectionParams, BubbleDistribution, BubbleParams, Config, ConfigError,
    ConstantForcing, EnthalpyMethodChoice, FieldStationForcing, FieldStationInitialConditions,
    ForcingConfig, InitialConditionsConfig, ModelChoice, MonoBubbleParams, NumericalParams,
    OceanForcingConfig, PhysicalParams, PowerLawBubbleParams, RadiativeForcing,
    ReanalysisForcing, Rjw14Params, SummerInitialConditions, WallDragLaw, YearlyForcing,
};

const SECONDS_PER_DAY: f64 = 86400.0;

/// Timescale `L² / κ` in days.
pub fn timescale_in_days(lengthscale: f64, thermal_diffusivity: f64) -> f64 {
    lengthscale.powi(2) / (thermal_diffusivity * SECONDS_PER_DAY)
}

/// Velocity scale `κ / L` in m/day.
pub fn velocity_scale_in_m_per_day(lengthscale: f64, thermal_diffusivity: f64) -> f64 {
    thermal_diffusivity * SECONDS_PER_DAY / lengthscale
}

// =============================================================================
// Scales
// =============================================================================

/// Conversion between physical and non-dimensional variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    /// Domain height (m)
    pub lengthscale: f64,
    /// Thermal diffusivity of the liquid (m²/s)
    pub thermal_diffusivity: f64,
    /// Thermal conductivity of the liquid (W/m/K)
    pub liquid_thermal_conductivity: f64,
    /// Far-field ocean salinity S_i (g/kg)
    pub ocean_salinity: f64,
    /// S_E - S_i (g/kg)
    pub salinity_difference: f64,
    /// Liquidus temperature of the ocean T_i (°C)
    pub ocean_freezing_temperature: f64,
    /// T_i - T_E (°C)
    pub temperature_difference: f64,
    /// Gas density (kg/m³)
    pub gas_density: f64,
    /// Saturation concentration of dissolved gas (kg/kg)
    pub saturation_concentration: f64,
}

impl Scales {
    pub fn timescale_in_days(&self) -> f64 {
        timescale_in_days(self.lengthscale, self.thermal_diffusivity)
    }

    pub fn velocity_scale_in_m_per_day(&self) -> f64 {
        velocity_scale_in_m_per_day(self.lengthscale, self.thermal_diffusivity)
    }

    /// °C → non-dimensional temperature.
    pub fn convert_from_dimensional_temperature(&self, temperature: f64) -> f64 {
        (temperature - self.ocean_freezing_temperature) / self.temperature_difference
    }

    pub fn convert_to_dimensional_temperature(&self, temperature: f64) -> f64 {
        self.temperature_difference * temperature + self.ocean_freezing_temperature
    }

    /// Depth in m → non-dimensional depth.
    pub fn convert_from_dimensional_grid(&self, depth: f64) -> f64 {
        depth / self.lengthscale
    }

    pub fn convert_to_dimensional_grid(&self, depth: f64) -> f64 {
        depth * self.lengthscale
    }

    /// Days → non-dimensional time.
    pub fn convert_from_dimensional_time(&self, days: f64) -> f64 {
        days / self.timescale_in_days()
    }

    pub fn convert_to_dimensional_time(&self, time: f64) -> f64 {
        time * self.timescale_in_days()
    }

    /// g/kg → non-dimensional bulk salinity.
    pub fn convert_from_dimensional_bulk_salinity(&self, salinity: f64) -> f64 {
        (salinity - self.ocean_salinity) / self.salinity_difference
    }

    pub fn convert_to_dimensional_bulk_salinity(&self, salinity: f64) -> f64 {
        self.salinity_difference * salinity + self.ocean_salinity
    }

    /// kg/m³ → non-dimensional bulk gas.
    pub fn convert_from_dimensional_bulk_gas(&self, gas: f64) -> f64 {
        gas / self.gas_density
    }

    pub fn convert_to_dimensional_bulk_gas(&self, gas: f64) -> f64 {
        gas * self.gas_density
    }

    /// kg(gas)/kg(liquid) → non-dimensional dissolved gas.
    pub fn convert_from_dimensional_dissolved_gas(&self, dissolved: f64) -> f64 {
        dissolved / self.saturation_concentration
    }

    pub fn convert_to_dimensional_dissolved_gas(&self, dissolved: f64) -> f64 {
        dissolved * self.saturation_concentration
    }

    /// Volumetric heating in W/m³ → non-dimensional heating `q L² / (k ΔT)`.
    pub fn convert_from_dimensional_heating(&self, heating: f64) -> f64 {
        heating * self.lengthscale.powi(2)
            / (self.liquid_thermal_conductivity * self.temperature_difference)
    }

    pub fn convert_to_dimensional_heating(&self, heating: f64) -> f64 {
        heating * self.liquid_thermal_conductivity * self.temperature_difference
            / self.lengthscale.powi(2)
    }

    /// Heat flux in W/m² → non-dimensional flux `F L / (k ΔT)`.
    pub fn convert_from_dimensional_heat_flux(&self, flux: f64) -> f64 {
        flux * self.lengthscale / (self.liquid_thermal_conductivity * self.temperature_difference)
    }

    pub fn convert_to_dimensional_heat_flux(&self, flux: f64) -> f64 {
        flux * self.liquid_thermal_conductivity * self.temperature_difference / self.lengthscale
    }
}

// =============================================================================
// Dimensional variants
// =============================================================================

/// Bubble size distribution with radii in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimensionalBubbleDistribution {
    Mono {
        /// default: 1e-3 m
        #[serde(default = "default_bubble_radius")]
        bubble_radius: f64,
    },
    PowerLaw {
        #[serde(default = "default_distribution_power")]
        bubble_distribution_power: f64,
        #[serde(default = "default_minimum_bubble_radius")]
        minimum_bubble_radius: f64,
        #[serde(default = "default_bubble_radius")]
        maximum_bubble_radius: f64,
    },
}

fn default_bubble_radius() -> f64 {
    1e-3
}

fn default_distribution_power() -> f64 {
    1.5
}

fn default_minimum_bubble_radius() -> f64 {
    1e-6
}

impl Default for DimensionalBubbleDistribution {
    fn default() -> Self {
        DimensionalBubbleDistribution::Mono {
            bubble_radius: default_bubble_radius(),
        }
    }
}

/// Rees Jones & Worster (2014) parameters in physical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionalRjw14Params {
    /// default: 40
    pub rayleigh_critical: f64,
    /// default: 0.03
    pub convection_strength: f64,
    /// Haline contraction coefficient β (kg/g).
    /// default: 7.5e-4
    pub haline_contraction_coefficient: f64,
    /// Permeability scale K_0 (m²).
    /// default: 1e-8
    pub reference_permeability: f64,
    /// default: false
    pub couple_bubble_to_horizontal_flow: bool,
    /// default: false
    pub couple_bubble_to_vertical_flow: bool,
}

impl Default for DimensionalRjw14Params {
    fn default() -> Self {
        Self {
            rayleigh_critical: 40.0,
            convection_strength: 0.03,
            haline_contraction_coefficient: 7.5e-4,
            reference_permeability: 1e-8,
            couple_bubble_to_horizontal_flow: false,
            couple_bubble_to_vertical_flow: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimensionalBrineConvection {
    #[default]
    None,
    #[serde(rename = "rjw14")]
    Rjw14(DimensionalRjw14Params),
}

/// Surface forcing with temperatures in °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimensionalForcing {
    Constant {
        /// default: -30.32 °C
        #[serde(default = "default_top_temperature")]
        constant_top_temperature: f64,
    },
    /// Sinusoid parameters are non-dimensional.
    Yearly(YearlyForcing),
    Reanalysis(ReanalysisForcing),
    FieldStation(FieldStationForcing),
    /// `constant_top_temperature` is in °C here.
    Radiative(RadiativeForcing),
}

fn default_top_temperature() -> f64 {
    -30.32
}

impl Default for DimensionalForcing {
    fn default() -> Self {
        DimensionalForcing::Constant {
            constant_top_temperature: default_top_temperature(),
        }
    }
}

/// Ocean boundary with heat flux in W/m².
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimensionalOceanForcing {
    #[default]
    FixedTemperature,
    FixedHeatFlux { heat_flux: f64 },
    FieldStation { data_path: PathBuf },
}

/// Initial conditions with depths in m and temperatures in °C.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimensionalInitialConditions {
    #[default]
    Uniform,
    FieldStation(FieldStationInitialConditions),
    Summer {
        /// default: 1 m
        #[serde(default = "default_summer_ice_depth")]
        initial_summer_ice_depth: f64,
        /// default: -2 °C
        #[serde(default = "default_summer_ocean_temperature")]
        initial_summer_ocean_temperature: f64,
        /// default: -4 °C
        #[serde(default = "default_summer_ice_temperature")]
        initial_summer_ice_temperature: f64,
    },
}

fn default_summer_ice_depth() -> f64 {
    1.0
}

fn default_summer_ocean_temperature() -> f64 {
    -2.0
}

fn default_summer_ice_temperature() -> f64 {
    -4.0
}

// =============================================================================
// DimensionalParams
// =============================================================================

/// Physical description of a run from which a non-dimensional [`Config`] is
/// derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DimensionalParams {
    pub name: String,
    pub model: ModelChoice,
    pub enthalpy_method: EnthalpyMethodChoice,

    /// default: 365 days
    pub total_time_in_days: f64,
    /// default: 1 day
    pub savefreq_in_days: f64,

    /// Domain height (m). default: 1
    pub lengthscale: f64,
    /// kg/m³. default: 1028
    pub liquid_density: f64,
    /// kg/m³. default: 1
    pub gas_density: f64,
    /// kg(gas)/kg(liquid). default: 1e-5
    pub saturation_concentration: f64,
    /// g/kg. default: 34
    pub ocean_salinity: f64,
    /// g/kg. default: 270
    pub eutectic_salinity: f64,
    /// °C. default: -21.1
    pub eutectic_temperature: f64,
    /// J/kg. default: 334e3
    pub latent_heat: f64,
    /// J/kg/K, equal for ice and water. default: 4184
    pub specific_heat_capacity: f64,

    /// default: false
    pub phase_average_conductivity: bool,
    /// W/m/K. default: 0.54
    pub liquid_thermal_conductivity: f64,
    /// W/m/K. default: 2.22
    pub solid_thermal_conductivity: f64,

    /// Molecular diffusivity of salt (m²/s), zero for none. default: 0
    pub salt_diffusivity: f64,
    /// Molecular diffusivity of dissolved gas (m²/s), zero for none. default: 0
    pub gas_diffusivity: f64,
    /// m/day. default: 0
    pub frame_velocity_dimensional: f64,
    /// Prescribed maximum Darcy velocity (m/day). default: 0
    pub liquid_velocity_dimensional: f64,
    /// default: 1
    pub eddy_diffusivity_ratio: f64,
    /// default: false
    pub eddy_diffuse_gas: bool,

    /// m/s². default: 9.81
    pub gravity: f64,
    /// Dynamic viscosity of the liquid (Pa s). default: 2.78e-3
    pub liquid_viscosity: f64,
    /// Dynamic viscosity of the gas phase (Pa s), zero for free slip. default: 0
    pub gas_viscosity: f64,

    /// Pore throat scale R_0 (m). default: 1e-3
    pub pore_radius: f64,
    /// default: 0.5
    pub pore_throat_scaling: f64,
    /// default: 6
    pub drag_exponent: f64,
    /// default: power
    pub wall_drag_law: WallDragLaw,
    pub bubble_distribution: DimensionalBubbleDistribution,
    /// default: false
    pub porosity_threshold: bool,
    /// default: 0.024
    pub porosity_threshold_value: f64,

    pub brine_convection: DimensionalBrineConvection,

    /// default: 1
    pub tolerable_super_saturation_fraction: f64,
    /// Nucleation timescale (s). default: 6869075
    pub nucleation_timescale: f64,

    /// Ocean dissolved gas (kg/kg). default: 1e-5
    pub far_gas_sat: f64,
    /// °C. default: -0.81
    pub far_temp: f64,
    /// g/kg. default: 34
    pub far_bulk_salinity: f64,
    pub ocean: DimensionalOceanForcing,

    pub initial_conditions: DimensionalInitialConditions,
    pub forcing: DimensionalForcing,
    pub numerical_params: NumericalParams,
}

impl Default for DimensionalParams {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            model: ModelChoice::Eqm,
            enthalpy_method: EnthalpyMethodChoice::Reduced,
            total_time_in_days: 365.0,
            savefreq_in_days: 1.0,
            lengthscale: 1.0,
            liquid_density: 1028.0,
            gas_density: 1.0,
            saturation_concentration: 1e-5,
            ocean_salinity: 34.0,
            eutectic_salinity: 270.0,
            eutectic_temperature: -21.1,
            latent_heat: 334e3,
            specific_heat_capacity: 4184.0,
            phase_average_conductivity: false,
            liquid_thermal_conductivity: 0.54,
            solid_thermal_conductivity: 2.22,
            salt_diffusivity: 0.0,
            gas_diffusivity: 0.0,
            frame_velocity_dimensional: 0.0,
            liquid_velocity_dimensional: 0.0,
            eddy_diffusivity_ratio: 1.0,
            eddy_diffuse_gas: false,
            gravity: 9.81,
            liquid_viscosity: 2.78e-3,
            gas_viscosity: 0.0,
            pore_radius: 1e-3,
            pore_throat_scaling: 0.5,
            drag_exponent: 6.0,
            wall_drag_law: WallDragLaw::Power,
            bubble_distribution: DimensionalBubbleDistribution::default(),
            porosity_threshold: false,
            porosity_threshold_value: 0.024,
            brine_convection: DimensionalBrineConvection::None,
            tolerable_super_saturation_fraction: 1.0,
            nucleation_timescale: 6869075.0,
            far_gas_sat: 1e-5,
            far_temp: -0.81,
            far_bulk_salinity: 34.0,
            ocean: DimensionalOceanForcing::FixedTemperature,
            initial_conditions: DimensionalInitialConditions::Uniform,
            forcing: DimensionalForcing::default(),
            numerical_params: NumericalParams::default(),
        }
    }
}

impl DimensionalParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// χ = ρ_l ξ_sat / ρ_g
    pub fn expansion_coefficient(&self) -> f64 {
        self.liquid_density * self.saturation_concentration / self.gas_density
    }

    /// ΔS = S_E - S_i
    pub fn salinity_difference(&self) -> f64 {
        self.eutectic_salinity - self.ocean_salinity
    }

    /// T_i = T_E S_i / S_E from the linear liquidus.
    pub fn ocean_freezing_temperature(&self) -> f64 {
        self.eutectic_temperature * self.ocean_salinity / self.eutectic_salinity
    }

    /// ΔT = T_i - T_E
    pub fn temperature_difference(&self) -> f64 {
        self.ocean_freezing_temperature() - self.eutectic_temperature
    }

    /// C = S_i / ΔS
    pub fn concentration_ratio(&self) -> f64 {
        self.ocean_salinity / self.salinity_difference()
    }

    /// St = L / (c_p ΔT)
    pub fn stefan_number(&self) -> f64 {
        self.latent_heat / (self.temperature_difference() * self.specific_heat_capacity)
    }

    /// κ = k_l / (ρ_l c_p) in m²/s.
    pub fn thermal_diffusivity(&self) -> f64 {
        self.liquid_thermal_conductivity / (self.liquid_density * self.specific_heat_capacity)
    }

    /// Ratio of thermal timescale to nucleation timescale.
    pub fn damkohler_number(&self) -> f64 {
        (self.lengthscale.powi(2) / self.thermal_diffusivity()) / self.nucleation_timescale
    }

    /// Le_S = κ / D_S, infinite without salt diffusion.
    pub fn lewis_salt(&self) -> f64 {
        lewis_number(self.thermal_diffusivity(), self.salt_diffusivity)
    }

    /// Le_G = κ / D_G, infinite without gas diffusion.
    pub fn lewis_gas(&self) -> f64 {
        lewis_number(self.thermal_diffusivity(), self.gas_diffusivity)
    }

    pub fn timescale_in_days(&self) -> f64 {
        timescale_in_days(self.lengthscale, self.thermal_diffusivity())
    }

    pub fn total_time(&self) -> f64 {
        self.total_time_in_days / self.timescale_in_days()
    }

    pub fn savefreq(&self) -> f64 {
        self.savefreq_in_days / self.timescale_in_days()
    }

    fn velocity_scale(&self) -> f64 {
        velocity_scale_in_m_per_day(self.lengthscale, self.thermal_diffusivity())
    }

    pub fn frame_velocity(&self) -> f64 {
        self.frame_velocity_dimensional / self.velocity_scale()
    }

    pub fn liquid_velocity(&self) -> f64 {
        self.liquid_velocity_dimensional / self.velocity_scale()
    }

    /// Buoyancy number: Stokes rise speed at the pore scale over κ / L.
    pub fn buoyancy(&self) -> f64 {
        let stokes_velocity = self.liquid_density * self.gravity * self.pore_radius.powi(2)
            / (3.0 * self.liquid_viscosity);
        stokes_velocity / (self.thermal_diffusivity() / self.lengthscale)
    }

    /// Haline Rayleigh number `ρ_l g β ΔS L K_0 / (κ μ)`.
    pub fn rayleigh_salt(&self, params: &DimensionalRjw14Params) -> f64 {
        self.liquid_density
            * self.gravity
            * params.haline_contraction_coefficient
            * self.salinity_difference()
            * self.lengthscale
            * params.reference_permeability
            / (self.thermal_diffusivity() * self.liquid_viscosity)
    }

    /// k_s / k_l
    pub fn conductivity_ratio(&self) -> f64 {
        self.solid_thermal_conductivity / self.liquid_thermal_conductivity
    }

    pub fn scales(&self) -> Scales {
        Scales {
            lengthscale: self.lengthscale,
            thermal_diffusivity: self.thermal_diffusivity(),
            liquid_thermal_conductivity: self.liquid_thermal_conductivity,
            ocean_salinity: self.ocean_salinity,
            salinity_difference: self.salinity_difference(),
            ocean_freezing_temperature: self.ocean_freezing_temperature(),
            temperature_difference: self.temperature_difference(),
            gas_density: self.gas_density,
            saturation_concentration: self.saturation_concentration,
        }
    }

    pub fn physical_params(&self) -> PhysicalParams {
        PhysicalParams {
            expansion_coefficient: self.expansion_coefficient(),
            concentration_ratio: self.concentration_ratio(),
            stefan_number: self.stefan_number(),
            lewis_salt: self.lewis_salt(),
            lewis_gas: self.lewis_gas(),
            frame_velocity: self.frame_velocity(),
            liquid_velocity: self.liquid_velocity(),
            phase_average_conductivity: self.phase_average_conductivity,
            conductivity_ratio: self.conductivity_ratio(),
            eddy_diffusivity_ratio: self.eddy_diffusivity_ratio,
            eddy_diffuse_gas: self.eddy_diffuse_gas,
            gas_viscosity_ratio: self.gas_viscosity / self.liquid_viscosity,
            tolerable_super_saturation_fraction: self.tolerable_super_saturation_fraction,
            damkohler_number: self.damkohler_number(),
        }
    }

    pub fn bubble_params(&self) -> BubbleParams {
        let distribution = match self.bubble_distribution {
            DimensionalBubbleDistribution::Mono { bubble_radius } => {
                BubbleDistribution::Mono(MonoBubbleParams {
                    bubble_radius_scaled: bubble_radius / self.pore_radius,
                })
            }
            DimensionalBubbleDistribution::PowerLaw {
                bubble_distribution_power,
                minimum_bubble_radius,
                maximum_bubble_radius,
            } => BubbleDistribution::PowerLaw(PowerLawBubbleParams {
                bubble_distribution_power,
                minimum_bubble_radius_scaled: minimum_bubble_radius / self.pore_radius,
                maximum_bubble_radius_scaled: maximum_bubble_radius / self.pore_radius,
            }),
        };
        BubbleParams {
            buoyancy: self.buoyancy(),
            pore_throat_scaling: self.pore_throat_scaling,
            drag_exponent: self.drag_exponent,
            wall_drag_law: self.wall_drag_law,
            porosity_threshold: self.porosity_threshold,
            porosity_threshold_value: self.porosity_threshold_value,
            distribution,
        }
    }

    pub fn brine_convection_params(&self) -> BrineConvectionParams {
        match &self.brine_convection {
            DimensionalBrineConvection::None => BrineConvectionParams::None,
            DimensionalBrineConvection::Rjw14(params) => {
                BrineConvectionParams::Rjw14(Rjw14Params {
                    rayleigh_salt: self.rayleigh_salt(params),
                    rayleigh_critical: params.rayleigh_critical,
                    convection_strength: params.convection_strength,
                    couple_bubble_to_horizontal_flow: params.couple_bubble_to_horizontal_flow,
                    couple_bubble_to_vertical_flow: params.couple_bubble_to_vertical_flow,
                })
            }
        }
    }

    pub fn boundary_config(&self) -> BoundaryConfig {
        let scales = self.scales();
        let ocean = match &self.ocean {
            DimensionalOceanForcing::FixedTemperature => OceanForcingConfig::FixedTemperature,
            DimensionalOceanForcing::FixedHeatFlux { heat_flux } => {
                OceanForcingConfig::FixedHeatFlux {
                    heat_flux: scales.convert_from_dimensional_heat_flux(*heat_flux),
                }
            }
            DimensionalOceanForcing::FieldStation { data_path } => {
                OceanForcingConfig::FieldStation {
                    data_path: data_path.clone(),
                }
            }
        };
        BoundaryConfig {
            far_gas_sat: scales.convert_from_dimensional_dissolved_gas(self.far_gas_sat),
            far_temp: scales.convert_from_dimensional_temperature(self.far_temp),
            far_bulk_salinity: scales.convert_from_dimensional_bulk_salinity(self.far_bulk_salinity),
            ocean,
        }
    }

    pub fn forcing_config(&self) -> ForcingConfig {
        let scales = self.scales();
        match &self.forcing {
            DimensionalForcing::Constant {
                constant_top_temperature,
            } => ForcingConfig::Constant(ConstantForcing {
                constant_top_temperature: scales
                    .convert_from_dimensional_temperature(*constant_top_temperature),
            }),
            DimensionalForcing::Yearly(yearly) => ForcingConfig::Yearly(yearly.clone()),
            DimensionalForcing::Reanalysis(reanalysis) => {
                ForcingConfig::Reanalysis(reanalysis.clone())
            }
            DimensionalForcing::FieldStation(station) => {
                ForcingConfig::FieldStation(station.clone())
            }
            DimensionalForcing::Radiative(radiative) => ForcingConfig::Radiative(RadiativeForcing {
                constant_top_temperature: scales
                    .convert_from_dimensional_temperature(radiative.constant_top_temperature),
                ..radiative.clone()
            }),
        }
    }

    pub fn initial_conditions_config(&self) -> InitialConditionsConfig {
        let scales = self.scales();
        match &self.initial_conditions {
            DimensionalInitialConditions::Uniform => InitialConditionsConfig::Uniform,
            DimensionalInitialConditions::FieldStation(station) => {
                InitialConditionsConfig::FieldStation(station.clone())
            }
            DimensionalInitialConditions::Summer {
                initial_summer_ice_depth,
                initial_summer_ocean_temperature,
                initial_summer_ice_temperature,
            } => InitialConditionsConfig::Summer(SummerInitialConditions {
                initial_summer_ice_depth: scales
                    .convert_from_dimensional_grid(*initial_summer_ice_depth),
                initial_summer_ocean_temperature: scales
                    .convert_from_dimensional_temperature(*initial_summer_ocean_temperature),
                initial_summer_ice_temperature: scales
                    .convert_from_dimensional_temperature(*initial_summer_ice_temperature),
            }),
        }
    }

    /// Non-dimensional configuration carrying these scales.
    pub fn to_config(&self) -> Config {
        Config {
            name: self.name.clone(),
            model: self.model,
            enthalpy_method: self.enthalpy_method,
            total_time: self.total_time(),
            savefreq: self.savefreq(),
            physical_params: self.physical_params(),
            bubble_params: self.bubble_params(),
            brine_convection: self.brine_convection_params(),
            forcing_config: self.forcing_config(),
            boundary_config: self.boundary_config(),
            initial_conditions_config: self.initial_conditions_config(),
            numerical_params: self.numerical_params.clone(),
            scales: Some(self.scales()),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Write `{name}_dimensional.yml` into `directory`.
    pub fn save(&self, directory: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        let path = directory
            .as_ref()
            .join(format!("{}_dimensional.yml", self.name));
        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }
}

fn lewis_number(thermal_diffusivity: f64, diffusivity: f64) -> f64 {
    if diffusivity == 0.0 {
        f64::INFINITY
    } else {
        thermal_diffusivity / diffusivity
    }
}
