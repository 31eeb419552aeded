//! ADC sample source

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// ADC conversion failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcError;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read one raw conversion result
    fn read(&mut self) -> Result<u16, AdcError>;
}

/// ADC resolution presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdcResolution {
    Bits8,
    Bits10,
    #[default]
    Bits12,
}

impl AdcResolution {
    /// Number of result bits
    pub const fn bits(self) -> u8 {
        match self {
            AdcResolution::Bits8 => 8,
            AdcResolution::Bits10 => 10,
            AdcResolution::Bits12 => 12,
        }
    }

    /// Largest sample value, `2^bits - 1`
    pub const fn full_scale(self) -> u16 {
        (1u16 << self.bits()) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_scale_counts() {
        assert_eq!(AdcResolution::Bits8.full_scale(), 255);
        assert_eq!(AdcResolution::Bits10.full_scale(), 1023);
        assert_eq!(AdcResolution::Bits12.full_scale(), 4095);
    }
}
