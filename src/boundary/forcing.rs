//! Prescribed temperature forcing at the column boundaries.
//!
//! A [`TemperatureForcing`] maps non-dimensional time to a non-dimensional
//! temperature. Records in physical units are wrapped in
//! [`SeriesTemperature`], which converts time to days before the lookup and
//! the interpolated °C value back to non-dimensional temperature.

use std::f64::consts::PI;

use crate::config::{Scales, YearlyForcing};
use crate::io::{ForcingLookupError, ForcingSeries};

/// Temperature as a function of time.
pub trait TemperatureForcing: Send + Sync {
    fn temperature(&self, time: f64) -> Result<f64, ForcingLookupError>;

    fn name(&self) -> &'static str;
}

/// Time independent temperature.
#[derive(Clone, Copy, Debug)]
pub struct ConstantTemperature {
    pub temperature: f64,
}

impl ConstantTemperature {
    pub fn new(temperature: f64) -> Self {
        Self { temperature }
    }
}

impl TemperatureForcing for ConstantTemperature {
    fn temperature(&self, _time: f64) -> Result<f64, ForcingLookupError> {
        Ok(self.temperature)
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Seasonal cycle `A (cos(2π t / P) + offset)`.
#[derive(Clone, Copy, Debug)]
pub struct YearlyTemperature {
    pub amplitude: f64,
    pub period: f64,
    pub offset: f64,
}

impl From<&YearlyForcing> for YearlyTemperature {
    fn from(cfg: &YearlyForcing) -> Self {
        Self {
            amplitude: cfg.amplitude,
            period: cfg.period,
            offset: cfg.offset,
        }
    }
}

impl TemperatureForcing for YearlyTemperature {
    fn temperature(&self, time: f64) -> Result<f64, ForcingLookupError> {
        Ok(self.amplitude * ((2.0 * PI * time / self.period).cos() + self.offset))
    }

    fn name(&self) -> &'static str {
        "yearly"
    }
}

/// Temperature interpolated from a record of days against °C.
#[derive(Clone, Debug)]
pub struct SeriesTemperature {
    series: ForcingSeries,
    scales: Scales,
}

impl SeriesTemperature {
    pub fn new(series: ForcingSeries, scales: Scales) -> Self {
        Self { series, scales }
    }

    pub fn series(&self) -> &ForcingSeries {
        &self.series
    }
}

impl TemperatureForcing for SeriesTemperature {
    fn temperature(&self, time: f64) -> Result<f64, ForcingLookupError> {
        let days = self.scales.convert_to_dimensional_time(time);
        let celsius = self.series.value_at(days).map_err(|err| ForcingLookupError {
            time,
            start: self.scales.convert_from_dimensional_time(err.start),
            end: self.scales.convert_from_dimensional_time(err.end),
        })?;
        Ok(self.scales.convert_from_dimensional_temperature(celsius))
    }

    fn name(&self) -> &'static str {
        "series"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_scales() -> Scales {
        Scales {
            lengthscale: 1.0,
            thermal_diffusivity: 1.0 / 86400.0,
            liquid_thermal_conductivity: 0.523,
            ocean_salinity: 34.0,
            salinity_difference: 196.0,
            ocean_freezing_temperature: -2.0,
            temperature_difference: 20.0,
            gas_density: 1.2,
            saturation_concentration: 2e-5,
        }
    }

    #[test]
    fn test_yearly_cycle() {
        let forcing = YearlyTemperature::from(&YearlyForcing::default());
        assert!((forcing.temperature(0.0).unwrap() - 0.0).abs() < 1e-14);
        assert!((forcing.temperature(2.0).unwrap() + 1.5).abs() < 1e-12);
        assert!((forcing.temperature(4.0).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_series_converts_units() {
        // Unit timescale in days, so non-dimensional time equals days
        let series = ForcingSeries::new(vec![0.0, 2.0], vec![-2.0, -22.0]).unwrap();
        let forcing = SeriesTemperature::new(series, test_scales());
        assert!((forcing.temperature(0.0).unwrap()).abs() < 1e-12);
        assert!((forcing.temperature(1.0).unwrap() + 0.5).abs() < 1e-12);

        let err = forcing.temperature(3.0).unwrap_err();
        assert_eq!(err.time, 3.0);
        assert!((err.end - 2.0).abs() < 1e-12);
    }
}
