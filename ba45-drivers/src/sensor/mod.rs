//! Sensor drivers

pub mod ntc;

pub use ntc::NtcSensor;
