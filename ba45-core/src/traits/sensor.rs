//! Temperature sensor traits

use crate::thermistor::ThermistorError;

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion error
    Adc,
    /// Sample could not be converted to a temperature
    Conversion(ThermistorError),
}

impl From<ThermistorError> for SensorError {
    fn from(e: ThermistorError) -> Self {
        SensorError::Conversion(e)
    }
}

/// Trait for temperature sensors
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_celsius(&mut self) -> Result<f32, SensorError>;

    /// Read the current temperature with 0.1°C resolution
    ///
    /// For example, 45.5°C is returned as 455. Values beyond the `i16` range
    /// saturate.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        let scaled = self.read_celsius()? * 10.0;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        Ok(rounded as i16)
    }

    /// Check if the sensor reading is valid
    fn is_valid(&mut self) -> bool {
        self.read_celsius().is_ok()
    }
}
