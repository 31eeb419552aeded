//! Standard Type TM (STM)

use ba45_hal::registers::tmc;
use ba45_hal::{Register, RegisterAccess};

use super::{
    check_10bit, read_10bit, write_10bit, write_counter_control, CompareClear, OutputControl,
    OutputStage, PinFunction, Polarity, TimerClock, TimerError, TimerMode,
};

/// CCRP match period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmPeriod {
    #[default]
    Clocks1024 = 0,
    Clocks128 = 1,
    Clocks256 = 2,
    Clocks384 = 3,
    Clocks512 = 4,
    Clocks640 = 5,
    Clocks768 = 6,
    Clocks896 = 7,
}

impl StmPeriod {
    pub const fn clocks(self) -> u16 {
        match self {
            StmPeriod::Clocks1024 => 1024,
            other => 128 * other as u16,
        }
    }
}

/// Which comparator sets the PWM duty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PwmControl {
    /// CCRP sets the period, CCRA the duty
    CcrpPeriod,
    /// CCRP sets the duty, CCRA the period
    #[default]
    CcrpDuty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StmConfig {
    pub clock: TimerClock,
    pub enabled: bool,
    pub period: StmPeriod,
    pub mode: TimerMode,
    pub pin: PinFunction,
    pub output: OutputControl,
    pub polarity: Polarity,
    pub pwm_control: PwmControl,
    pub compare_clear: CompareClear,
    pub ccra: u16,
}

impl Default for StmConfig {
    fn default() -> Self {
        Self {
            clock: TimerClock::Fsys,
            enabled: true,
            period: StmPeriod::Clocks1024,
            mode: TimerMode::CompareMatchOutput,
            pin: PinFunction::NO_CHANGE,
            output: OutputControl::Low,
            polarity: Polarity::NonInverted,
            pwm_control: PwmControl::CcrpDuty,
            compare_clear: CompareClear::A,
            ccra: 1,
        }
    }
}

pub struct Stm<R> {
    regs: R,
    config: StmConfig,
}

impl<R: RegisterAccess> Stm<R> {
    pub fn new(mut regs: R, config: StmConfig) -> Result<Self, TimerError> {
        check_10bit(config.ccra)?;

        write_counter_control(&mut regs, Register::Stmc0, config.clock, config.enabled);
        regs.write_field(Register::Stmc0, tmc::RP, config.period as u8);

        OutputStage {
            mode: config.mode,
            pin: config.pin,
            output: config.output,
            polarity: config.polarity,
            select: config.pwm_control == PwmControl::CcrpDuty,
            clear: config.compare_clear,
        }
        .write(&mut regs, Register::Stmc1);

        write_10bit(&mut regs, Register::Stmal, Register::Stmah, config.ccra)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "stm: {} mode, period {=u16} clocks",
            config.mode,
            config.period.clocks()
        );

        Ok(Self { regs, config })
    }

    pub fn config(&self) -> &StmConfig {
        &self.config
    }

    /// Current 10-bit counter value
    pub fn counter(&mut self) -> u16 {
        read_10bit(&mut self.regs, Register::Stmdl, Register::Stmdh)
    }

    pub fn set_compare_a(&mut self, value: u16) -> Result<(), TimerError> {
        write_10bit(&mut self.regs, Register::Stmal, Register::Stmah, value)?;
        self.config.ccra = value;
        Ok(())
    }

    /// Pause or resume the counter without resetting it
    pub fn set_running(&mut self, running: bool) {
        self.regs.write_bits(Register::Stmc0, tmc::PAU, !running);
    }

    pub fn release(self) -> R {
        self.regs
    }
}
