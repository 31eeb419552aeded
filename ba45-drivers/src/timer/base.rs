//! Time Base 0/1
//!
//! Both time bases divide one shared prescaler clock (selected in PSCR) and
//! raise their interrupt flag every `2^(8+n)` prescaler clocks.

use ba45_hal::registers::{intc, tbc};
use ba45_hal::{Register, RegisterAccess};

use crate::interrupt::Vector;

/// Prescaler clock feeding both time bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeBaseClock {
    Fsys = 0,
    FsysDiv4 = 1,
    #[default]
    Fsub = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeBase {
    Zero,
    One,
}

impl TimeBase {
    fn control(self) -> Register {
        match self {
            TimeBase::Zero => Register::Tb0c,
            TimeBase::One => Register::Tb1c,
        }
    }

    /// Interrupt vector raised on time-out
    pub const fn vector(self) -> Vector {
        match self {
            TimeBase::Zero => Vector::TimeBase0,
            TimeBase::One => Vector::TimeBase1,
        }
    }
}

/// Time-out period in prescaler clocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeBasePeriod {
    #[default]
    Clocks256 = 0,
    Clocks512 = 1,
    Clocks1024 = 2,
    Clocks2048 = 3,
    Clocks4096 = 4,
    Clocks8192 = 5,
    Clocks16384 = 6,
    Clocks32768 = 7,
}

impl TimeBasePeriod {
    pub const fn clocks(self) -> u32 {
        1 << (8 + self as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBaseConfig {
    pub enabled: bool,
    pub period: TimeBasePeriod,
}

impl Default for TimeBaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: TimeBasePeriod::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseTimerConfig {
    pub clock: TimeBaseClock,
    pub time_base0: TimeBaseConfig,
    pub time_base1: TimeBaseConfig,
    /// Set EMI once the time bases are programmed
    pub global_interrupt: bool,
}

impl Default for BaseTimerConfig {
    /// fSUB clock, both time bases on at 256 clocks, interrupts on
    fn default() -> Self {
        Self {
            clock: TimeBaseClock::Fsub,
            time_base0: TimeBaseConfig::default(),
            time_base1: TimeBaseConfig::default(),
            global_interrupt: true,
        }
    }
}

pub struct BaseTimer<R> {
    regs: R,
    config: BaseTimerConfig,
}

impl<R: RegisterAccess> BaseTimer<R> {
    pub fn new(mut regs: R, config: BaseTimerConfig) -> Self {
        regs.write_field(Register::Pscr, tbc::CLKSEL, config.clock as u8);
        for (base, tb) in [
            (TimeBase::Zero, config.time_base0),
            (TimeBase::One, config.time_base1),
        ] {
            regs.write_bits(base.control(), tbc::TBON, tb.enabled);
            regs.write_field(base.control(), tbc::PERIOD, tb.period as u8);
        }
        if config.global_interrupt {
            regs.set_bits(Register::Intc0, intc::EMI);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "time base: {}, tb0 {=u32} clocks, tb1 {=u32} clocks",
            config.clock,
            config.time_base0.period.clocks(),
            config.time_base1.period.clocks()
        );

        Self { regs, config }
    }

    pub fn config(&self) -> &BaseTimerConfig {
        &self.config
    }

    /// Time-out period of `base` in prescaler clocks
    pub fn period_clocks(&self, base: TimeBase) -> u32 {
        self.time_base(base).period.clocks()
    }

    /// Switch a time base on or off
    pub fn set_enabled(&mut self, base: TimeBase, enabled: bool) {
        match base {
            TimeBase::Zero => self.config.time_base0.enabled = enabled,
            TimeBase::One => self.config.time_base1.enabled = enabled,
        }
        self.regs.write_bits(base.control(), tbc::TBON, enabled);
    }

    /// Check and clear the time-out flag of `base`
    pub fn take_expired(&mut self, base: TimeBase) -> bool {
        let vector = base.vector();
        let expired = self.regs.read_bits(vector.register(), vector.flag_mask());
        if expired {
            self.regs.clear_bits(vector.register(), vector.flag_mask());
        }
        expired
    }

    pub fn release(self) -> R {
        self.regs
    }

    fn time_base(&self, base: TimeBase) -> &TimeBaseConfig {
        match base {
            TimeBase::Zero => &self.config.time_base0,
            TimeBase::One => &self.config.time_base1,
        }
    }
}
