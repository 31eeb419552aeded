//! Peripheral driver implementations
//!
//! This crate provides blocking, register-level drivers for the BA45F5240
//! built on the [`ba45_hal::RegisterAccess`] capability:
//!
//! - Serial transceiver (UART byte in/out with line fault classification)
//! - Data EEPROM byte store
//! - Interrupt vector table
//! - Timers (time bases, PTM, STM)
//! - NTC thermistor sensor

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod eeprom;
pub mod interrupt;
pub mod sensor;
pub mod timer;
pub mod uart;

#[cfg(test)]
pub(crate) mod mock;

pub use eeprom::{Eeprom, EepromError};
pub use interrupt::{InterruptConfig, InterruptController, InterruptError, Vector};
pub use sensor::NtcSensor;
pub use timer::{BaseTimer, Ptm, Stm, TimerError};
pub use uart::{ReceiveOutcome, SerialTransceiver, UartError};
