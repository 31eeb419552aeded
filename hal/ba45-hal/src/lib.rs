//! BA45F5240 Hardware Abstraction Layer
//!
//! This crate defines the register model of the Holtek BA45F5240 and the
//! traits drivers are written against. Drivers never touch memory-mapped
//! registers directly; they are handed a [`RegisterAccess`] implementation,
//! which on the target wraps the special-function registers and in tests is
//! a scripted register file.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application code                       │
//! └─────────────────────────────────────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐   ┌───────────────────┐
//! │  ba45-drivers   │──▶│  ba45-core        │
//! │  (uart, eeprom, │   │  (thermistor math)│
//! │  timers, ...)   │   └───────────────────┘
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────┐
//! │  ba45-hal (this crate - registers)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`registers::RegisterAccess`] - Typed register reads and writes
//! - [`uart::UartTx`], [`uart::UartRx`] - Blocking single-byte serial I/O
//! - [`eeprom::ByteStore`] - Single-byte persistent cells
//! - [`adc::AdcReader`] - Raw ADC samples

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod eeprom;
pub mod poll;
pub mod registers;
pub mod uart;

// Re-export key items at crate root for convenience
pub use adc::{AdcError, AdcReader, AdcResolution};
pub use eeprom::ByteStore;
pub use poll::{wait_until, PollLimit, TimedOut};
pub use registers::{Register, RegisterAccess};
pub use uart::{UartRx, UartTx};
