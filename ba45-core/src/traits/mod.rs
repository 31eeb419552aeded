//! Sensor abstraction traits
//!
//! These traits define the interface between application logic and
//! sensor implementations.

pub mod sensor;

pub use sensor::{SensorError, TemperatureSensor};
