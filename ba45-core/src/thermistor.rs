//! NTC thermistor conversion
//!
//! Converts a raw ADC sample taken across a thermistor voltage divider into
//! a temperature:
//!
//! 1. `Vntc = Vdd · sample / full_scale`
//! 2. Divider resistance from `Vntc`, `Vdd` and the fixed resistor
//! 3. `ln(R)` with the configured [`Logarithm`]
//! 4. Steinhart-Hart: `T = 1 / (A + B·ln(R) + C·ln(R)³) - 273.15`
//!
//! The result is returned as-is. Out-of-range inputs that make the math
//! undefined are reported as errors instead of sentinel values.

use crate::config::{DividerTopology, ThermistorConfig};
use crate::math::{LogDomainError, Logarithm};

/// Offset between kelvin and degrees Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Errors from thermistor conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermistorError {
    /// Sample above the ADC full-scale count
    InvalidSample,
    /// Supply voltage not positive
    InvalidSupply,
    /// A divisor in the divider or Steinhart-Hart formula is zero
    DivisionSingularity,
    /// Resistance not positive, so its logarithm is undefined
    LogDomain,
}

impl From<LogDomainError> for ThermistorError {
    fn from(_: LogDomainError) -> Self {
        ThermistorError::LogDomain
    }
}

/// ADC sample to temperature converter
#[derive(Debug, Clone, Copy)]
pub struct ThermistorConverter {
    config: ThermistorConfig,
    logarithm: Logarithm,
}

impl ThermistorConverter {
    /// Create a converter using the range-reduced series logarithm
    pub fn new(config: ThermistorConfig) -> Self {
        Self {
            config,
            logarithm: Logarithm::default(),
        }
    }

    /// Use a different logarithm strategy
    pub fn with_logarithm(mut self, logarithm: Logarithm) -> Self {
        self.logarithm = logarithm;
        self
    }

    /// Get the converter configuration
    pub fn config(&self) -> &ThermistorConfig {
        &self.config
    }

    /// Get the logarithm strategy
    pub fn logarithm(&self) -> Logarithm {
        self.logarithm
    }

    /// Convert a raw sample taken with supply voltage `vdd` to °C
    pub fn temperature(&self, sample: u16, vdd: f32) -> Result<f32, ThermistorError> {
        let vntc = self.divider_voltage(sample, vdd)?;
        let resistance = self.thermistor_resistance(vntc, vdd)?;
        self.celsius_from_resistance(resistance)
    }

    /// Voltage at the divider tap: `Vdd · sample / full_scale`
    pub fn divider_voltage(&self, sample: u16, vdd: f32) -> Result<f32, ThermistorError> {
        check_supply(vdd)?;

        let full_scale = self.config.resolution.full_scale();
        if sample > full_scale {
            return Err(ThermistorError::InvalidSample);
        }

        // Ratio first so that sample == full_scale gives exactly Vdd
        Ok(vdd * (sample as f32 / full_scale as f32))
    }

    /// Thermistor resistance for divider voltage `vntc`
    ///
    /// - Pull-up: `R = Vntc / (Vdd - Vntc) · Rfixed`
    /// - Pull-down: `R = (Vdd - Vntc) / Vntc · Rfixed`
    pub fn thermistor_resistance(&self, vntc: f32, vdd: f32) -> Result<f32, ThermistorError> {
        check_supply(vdd)?;

        let (numerator, denominator) = match self.config.topology {
            DividerTopology::PullUp => (vntc, vdd - vntc),
            DividerTopology::PullDown => (vdd - vntc, vntc),
        };

        if denominator == 0.0 {
            return Err(ThermistorError::DivisionSingularity);
        }

        Ok(numerator / denominator * self.config.fixed_resistor_ohms)
    }

    /// Steinhart-Hart temperature in °C for a thermistor resistance in ohms
    pub fn celsius_from_resistance(&self, resistance: f32) -> Result<f32, ThermistorError> {
        let ln_r = self.logarithm.ln(resistance as f64)?;
        let coefficients = &self.config.coefficients;

        let inverse_kelvin =
            coefficients.a + coefficients.b * ln_r + coefficients.c * ln_r * ln_r * ln_r;
        if inverse_kelvin == 0.0 {
            return Err(ThermistorError::DivisionSingularity);
        }

        Ok((1.0 / inverse_kelvin - KELVIN_OFFSET) as f32)
    }
}

impl Default for ThermistorConverter {
    fn default() -> Self {
        Self::new(ThermistorConfig::default())
    }
}

fn check_supply(vdd: f32) -> Result<(), ThermistorError> {
    if vdd > 0.0 && vdd.is_finite() {
        Ok(())
    } else {
        Err(ThermistorError::InvalidSupply)
    }
}
