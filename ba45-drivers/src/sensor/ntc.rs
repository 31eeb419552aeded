//! NTC thermistor sensor
//!
//! Pairs an ADC channel wired to the thermistor divider with a
//! [`ThermistorConverter`]. The supply voltage is tracked separately since
//! the part can run from a varying battery rail.

use ba45_core::traits::{SensorError, TemperatureSensor};
use ba45_core::{ThermistorConfig, ThermistorConverter};
use ba45_hal::AdcReader;

/// Nominal supply voltage in volts
pub const DEFAULT_VDD: f32 = 5.0;

/// NTC thermistor read through an ADC
pub struct NtcSensor<ADC> {
    adc: ADC,
    converter: ThermistorConverter,
    /// Divider supply voltage in volts
    vdd: f32,
}

impl<ADC> NtcSensor<ADC> {
    /// Create a sensor
    ///
    /// # Arguments
    /// - `adc`: ADC channel connected to the divider tap
    /// - `converter`: divider and calibration description
    /// - `vdd`: divider supply voltage in volts
    pub fn new(adc: ADC, converter: ThermistorConverter, vdd: f32) -> Self {
        Self {
            adc,
            converter,
            vdd,
        }
    }

    /// Sensor for `config` with the default logarithm at [`DEFAULT_VDD`]
    pub fn with_config(adc: ADC, config: ThermistorConfig) -> Self {
        Self::new(adc, ThermistorConverter::new(config), DEFAULT_VDD)
    }

    /// Update the measured supply voltage
    pub fn set_supply(&mut self, vdd: f32) {
        self.vdd = vdd;
    }

    pub fn supply(&self) -> f32 {
        self.vdd
    }

    pub fn converter(&self) -> &ThermistorConverter {
        &self.converter
    }

    pub fn release(self) -> ADC {
        self.adc
    }
}

impl<ADC: AdcReader> TemperatureSensor for NtcSensor<ADC> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let sample = self.adc.read().map_err(|_| SensorError::Adc)?;
        let celsius = self.converter.temperature(sample, self.vdd)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("ntc: sample {=u16} -> {=f32} C", sample, celsius);

        Ok(celsius)
    }
}

/// Dummy ADC for testing (returns a fixed value)
#[cfg(test)]
pub struct DummyAdc(pub Result<u16, ba45_hal::AdcError>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ba45_hal::AdcError> {
        self.0
    }
}
