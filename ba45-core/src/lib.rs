//! Board-agnostic conversion logic for BA45F5240 peripherals
//!
//! This crate contains the parts of the peripheral drivers that are pure
//! arithmetic and can be tested on the host:
//!
//! - NTC thermistor conversion (voltage divider + Steinhart-Hart)
//! - Natural logarithm series for targets without a math library
//! - UART baud rate divisor computation
//! - Sensor traits and configuration types

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod math;
pub mod serial;
pub mod thermistor;
pub mod traits;

pub use config::{DividerTopology, SteinhartHart, ThermistorConfig};
pub use math::{LogDomainError, Logarithm};
pub use thermistor::{ThermistorConverter, ThermistorError};
