//! Periodic Type TM (PTM)

use ba45_hal::registers::{pins, tmc};
use ba45_hal::{Register, RegisterAccess};

use super::{
    check_10bit, read_10bit, write_10bit, write_counter_control, CompareClear, OutputControl,
    OutputStage, PinFunction, Polarity, TimerClock, TimerError, TimerMode,
};

/// Capture trigger source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptureTrigger {
    #[default]
    Ptpi,
    Ptck,
}

/// Counter clear condition in capture input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptureClear {
    CompareP = 0,
    #[default]
    CompareOrRising = 1,
    CompareOrFalling = 2,
    CompareOrBothEdges = 3,
}

/// Edge that latches the counter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LatchEdge {
    #[default]
    Falling,
    Rising,
}

/// PTM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PtmConfig {
    pub clock: TimerClock,
    /// Counter on (PTON)
    pub enabled: bool,
    pub mode: TimerMode,
    pub pin: PinFunction,
    pub output: OutputControl,
    pub polarity: Polarity,
    pub capture_trigger: CaptureTrigger,
    pub compare_clear: CompareClear,
    /// Only written in [`TimerMode::CaptureInput`]
    pub capture_clear: CaptureClear,
    pub latch_edge: LatchEdge,
    pub ccra: u16,
    pub ccrb: u16,
    pub ccrp: u16,
}

impl Default for PtmConfig {
    fn default() -> Self {
        Self {
            clock: TimerClock::Fsys,
            enabled: true,
            mode: TimerMode::CaptureInput,
            pin: PinFunction::NO_CHANGE,
            output: OutputControl::Low,
            polarity: Polarity::NonInverted,
            capture_trigger: CaptureTrigger::Ptpi,
            compare_clear: CompareClear::P,
            capture_clear: CaptureClear::CompareOrRising,
            latch_edge: LatchEdge::Falling,
            ccra: 1,
            ccrb: 1,
            ccrp: 0x101,
        }
    }
}

/// IFS0 selection routing PTPI to its alternate pin
const PTPI_REMAP: u8 = 0b01;

pub struct Ptm<R> {
    regs: R,
    config: PtmConfig,
}

impl<R: RegisterAccess> Ptm<R> {
    /// Program the PTM
    ///
    /// Comparator values are checked before any register is written.
    pub fn new(mut regs: R, config: PtmConfig) -> Result<Self, TimerError> {
        for value in [config.ccra, config.ccrb, config.ccrp] {
            check_10bit(value)?;
        }

        regs.write_field(Register::Ifs0, pins::IFS0_PTPI, PTPI_REMAP);
        write_counter_control(&mut regs, Register::Ptmc0, config.clock, config.enabled);

        OutputStage {
            mode: config.mode,
            pin: config.pin,
            output: config.output,
            polarity: config.polarity,
            select: config.capture_trigger == CaptureTrigger::Ptck,
            clear: config.compare_clear,
        }
        .write(&mut regs, Register::Ptmc1);

        if config.mode == TimerMode::CaptureInput {
            regs.write_field(Register::Ptmc2, tmc::TCLR, config.capture_clear as u8);
        }
        regs.write_bits(
            Register::Ptmc2,
            tmc::VLF,
            config.latch_edge == LatchEdge::Rising,
        );

        write_10bit(&mut regs, Register::Ptmal, Register::Ptmah, config.ccra)?;
        write_10bit(&mut regs, Register::Ptmbl, Register::Ptmbh, config.ccrb)?;
        write_10bit(&mut regs, Register::Ptmrpl, Register::Ptmrph, config.ccrp)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("ptm: {} mode, clock {}", config.mode, config.clock);

        Ok(Self { regs, config })
    }

    pub fn config(&self) -> &PtmConfig {
        &self.config
    }

    /// Load CCRA/CCRP and run the counter
    ///
    /// A `period` of 0 is a full 1024-clock cycle.
    pub fn start_pwm(&mut self, duty: u16, period: u16) -> Result<(), TimerError> {
        check_10bit(duty)?;
        check_10bit(period)?;

        write_10bit(&mut self.regs, Register::Ptmal, Register::Ptmah, duty)?;
        write_10bit(&mut self.regs, Register::Ptmrpl, Register::Ptmrph, period)?;
        self.regs.clear_bits(Register::Ptmc0, tmc::PAU);
        self.regs.set_bits(Register::Ptmc0, tmc::ON);

        self.config.ccra = duty;
        self.config.ccrp = period;
        self.config.enabled = true;
        Ok(())
    }

    /// Pause and switch off the counter, then zero CCRA and CCRP
    pub fn stop(&mut self) {
        self.regs.set_bits(Register::Ptmc0, tmc::PAU);
        self.regs.clear_bits(Register::Ptmc0, tmc::ON);
        self.regs.write(Register::Ptmrpl, 0);
        self.regs.write(Register::Ptmrph, 0);
        self.regs.write(Register::Ptmal, 0);
        self.regs.write(Register::Ptmah, 0);

        self.config.ccra = 0;
        self.config.ccrp = 0;
        self.config.enabled = false;
    }

    /// Current 10-bit counter value
    pub fn counter(&mut self) -> u16 {
        read_10bit(&mut self.regs, Register::Ptmdl, Register::Ptmdh)
    }

    pub fn set_compare_a(&mut self, value: u16) -> Result<(), TimerError> {
        write_10bit(&mut self.regs, Register::Ptmal, Register::Ptmah, value)?;
        self.config.ccra = value;
        Ok(())
    }

    pub fn set_compare_b(&mut self, value: u16) -> Result<(), TimerError> {
        write_10bit(&mut self.regs, Register::Ptmbl, Register::Ptmbh, value)?;
        self.config.ccrb = value;
        Ok(())
    }

    pub fn set_period(&mut self, value: u16) -> Result<(), TimerError> {
        write_10bit(&mut self.regs, Register::Ptmrpl, Register::Ptmrph, value)?;
        self.config.ccrp = value;
        Ok(())
    }

    pub fn release(self) -> R {
        self.regs
    }
}
