//! Timer drivers
//!
//! - [`BaseTimer`]: Time Base 0/1 periodic interrupt sources
//! - [`Ptm`]: Periodic Type TM with 10-bit CCRA/CCRB/CCRP
//! - [`Stm`]: Standard Type TM with 10-bit CCRA and a 3-bit CCRP
//!
//! PTM and STM share the clock, mode and output settings defined here.

pub mod base;
pub mod ptm;
pub mod stm;

pub use base::{
    BaseTimer, BaseTimerConfig, TimeBase, TimeBaseClock, TimeBaseConfig, TimeBasePeriod,
};
pub use ptm::{CaptureClear, CaptureTrigger, LatchEdge, Ptm, PtmConfig};
pub use stm::{PwmControl, Stm, StmConfig, StmPeriod};

use ba45_hal::registers::tmc;
use ba45_hal::{Register, RegisterAccess};

/// Largest value of a 10-bit counter or comparator
pub const MAX_10BIT: u16 = 0x3FF;

/// Error from timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// A comparator value does not fit in 10 bits
    ValueOutOfRange(u16),
}

/// TM counter clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerClock {
    FsysDiv4 = 0,
    #[default]
    Fsys = 1,
    FhDiv16 = 2,
    FhDiv64 = 3,
    Fsub = 4,
    FsubAlt = 5,
    /// Rising edge on the TM clock pin (PTCK/STCK)
    PtckRising = 6,
    /// Falling edge on the TM clock pin (PTCK/STCK)
    PtckFalling = 7,
}

/// TM operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerMode {
    CompareMatchOutput = 0,
    CaptureInput = 1,
    PwmOrSinglePulse = 2,
    TimerCounter = 3,
}

/// TM output pin function
///
/// The two-bit value means different things per [`TimerMode`], so the
/// constants are grouped by the mode they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinFunction(u8);

impl PinFunction {
    // Compare match output
    pub const NO_CHANGE: Self = Self(0);
    pub const OUTPUT_LOW: Self = Self(1);
    pub const OUTPUT_HIGH: Self = Self(2);
    pub const TOGGLE: Self = Self(3);

    // PWM / single pulse output
    pub const PWM_INACTIVE: Self = Self(0);
    pub const PWM_ACTIVE: Self = Self(1);
    pub const PWM_OUTPUT: Self = Self(2);
    pub const SINGLE_PULSE: Self = Self(3);

    // Capture input
    pub const CAPTURE_RISING: Self = Self(0);
    pub const CAPTURE_FALLING: Self = Self(1);
    pub const CAPTURE_BOTH_EDGES: Self = Self(2);
    pub const CAPTURE_DISABLED: Self = Self(3);

    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Initial output level (compare match) or active level (PWM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputControl {
    #[default]
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    #[default]
    NonInverted,
    Inverted,
}

/// Comparator whose match clears the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareClear {
    P,
    A,
}

/// Output settings shared by the PTMC1/STMC1 registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutputStage {
    pub mode: TimerMode,
    pub pin: PinFunction,
    pub output: OutputControl,
    pub polarity: Polarity,
    /// PTM capture trigger or STM duty/period select
    pub select: bool,
    pub clear: CompareClear,
}

impl OutputStage {
    /// Program a C1 register
    pub(crate) fn write<R: RegisterAccess>(&self, regs: &mut R, reg: Register) {
        regs.write_field(reg, tmc::MODE, self.mode as u8);
        regs.write_field(reg, tmc::IO, self.pin.bits());
        regs.write_bits(reg, tmc::OC, self.output == OutputControl::High);
        regs.write_bits(reg, tmc::POL, self.polarity == Polarity::Inverted);
        regs.write_bits(reg, tmc::CAPTS_DPX, self.select);
        regs.write_bits(reg, tmc::CCLR, self.clear == CompareClear::A);
    }
}

/// Program the counter control bits of a C0 register
///
/// Leaves the STM period field alone.
pub(crate) fn write_counter_control<R: RegisterAccess>(
    regs: &mut R,
    reg: Register,
    clock: TimerClock,
    enabled: bool,
) {
    regs.clear_bits(reg, tmc::PAU);
    regs.write_field(reg, tmc::CK, clock as u8);
    regs.write_bits(reg, tmc::ON, enabled);
}

pub(crate) fn check_10bit(value: u16) -> Result<u16, TimerError> {
    if value > MAX_10BIT {
        return Err(TimerError::ValueOutOfRange(value));
    }
    Ok(value)
}

/// Write a 10-bit value, low byte first
pub(crate) fn write_10bit<R: RegisterAccess>(
    regs: &mut R,
    low: Register,
    high: Register,
    value: u16,
) -> Result<(), TimerError> {
    let [lo, hi] = check_10bit(value)?.to_le_bytes();
    regs.write(low, lo);
    regs.write(high, hi & tmc::HIGH_MASK);
    Ok(())
}

/// Read a 10-bit counter, high byte first
///
/// Reading the high byte latches the low byte into the TM buffer, so both
/// halves come from the same count. Writes go the other way round: the low
/// byte is buffered until the high byte is written.
pub(crate) fn read_10bit<R: RegisterAccess>(regs: &mut R, low: Register, high: Register) -> u16 {
    let hi = regs.read(high) & tmc::HIGH_MASK;
    let lo = regs.read(low);
    u16::from_le_bytes([lo, hi])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Access, MockRegisters};

    #[test]
    fn test_write_10bit_split() {
        let mut regs = MockRegisters::new();
        write_10bit(&mut regs, Register::Ptmal, Register::Ptmah, 0x2A5).unwrap();
        assert_eq!(
            regs.log(),
            [
                Access::Write(Register::Ptmal, 0xA5),
                Access::Write(Register::Ptmah, 0x02),
            ]
        );
    }

    #[test]
    fn test_write_10bit_rejects_wide_values() {
        let mut regs = MockRegisters::new();
        assert_eq!(
            write_10bit(&mut regs, Register::Ptmal, Register::Ptmah, 0x400),
            Err(TimerError::ValueOutOfRange(0x400))
        );
        assert!(regs.log().is_empty());
    }

    #[test]
    fn test_read_10bit_masks_high_byte() {
        let mut regs = MockRegisters::new()
            .with(Register::Stmdl, 0x34)
            .with(Register::Stmdh, 0xFE);
        assert_eq!(read_10bit(&mut regs, Register::Stmdl, Register::Stmdh), 0x234);
        assert_eq!(regs.first_write(Register::Stmdl), None);
    }

    #[test]
    fn test_read_10bit_high_byte_first() {
        let mut regs = MockRegisters::new()
            .with(Register::Ptmdl, 0x01)
            .with(Register::Ptmdh, 0x02);
        read_10bit(&mut regs, Register::Ptmdl, Register::Ptmdh);
        assert_eq!(
            regs.log(),
            [
                Access::Read(Register::Ptmdh, 0x02),
                Access::Read(Register::Ptmdl, 0x01),
            ]
        );
    }

    #[test]
    fn test_output_stage_bits() {
        let stage = OutputStage {
            mode: TimerMode::PwmOrSinglePulse,
            pin: PinFunction::PWM_OUTPUT,
            output: OutputControl::High,
            polarity: Polarity::Inverted,
            select: false,
            clear: CompareClear::A,
        };
        let mut regs = MockRegisters::new();
        stage.write(&mut regs, Register::Ptmc1);
        assert_eq!(
            regs.get(Register::Ptmc1),
            0b10 << 6 | 0b10 << 4 | tmc::OC | tmc::POL | tmc::CCLR
        );
    }
}
