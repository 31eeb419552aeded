//! Thermistor configuration types

use ba45_hal::AdcResolution;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default fixed divider resistor (ohms)
pub const DEFAULT_FIXED_RESISTOR_OHMS: f32 = 10_000.0;

/// How the thermistor and the fixed resistor form the voltage divider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DividerTopology {
    /// NTC to VCC, fixed resistor to GND: `R = Vntc / (Vdd - Vntc) * Rfixed`
    #[default]
    PullUp,
    /// Fixed resistor to VCC, NTC to GND: `R = (Vdd - Vntc) / Vntc * Rfixed`
    PullDown,
}

/// Steinhart-Hart coefficients
///
/// `1/T = A + B·ln(R) + C·ln(R)³`, with `T` in kelvin and `R` in ohms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SteinhartHart {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl SteinhartHart {
    /// Create a coefficient set
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

impl Default for SteinhartHart {
    /// 10K NTC fitted through three calibration points:
    /// - -30°C at 154 882 Ω
    /// - 25°C at 10 000 Ω
    /// - 80°C at 1 228 Ω
    fn default() -> Self {
        Self::new(0.001277368, 0.000208223, 0.0000002032989)
    }
}

/// Thermistor front-end configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThermistorConfig {
    /// ADC resolution the samples are taken at
    pub resolution: AdcResolution,
    /// Divider arrangement
    pub topology: DividerTopology,
    /// Fixed divider resistor, in the same unit as the calibration (ohms)
    pub fixed_resistor_ohms: f32,
    /// Calibration coefficients
    pub coefficients: SteinhartHart,
}

impl Default for ThermistorConfig {
    fn default() -> Self {
        Self {
            resolution: AdcResolution::Bits12,
            topology: DividerTopology::PullUp,
            fixed_resistor_ohms: DEFAULT_FIXED_RESISTOR_OHMS,
            coefficients: SteinhartHart::default(),
        }
    }
}
