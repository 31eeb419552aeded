//! Configuration types
//!
//! Plain structs with `Default` impls, chosen when a converter is
//! constructed.

pub mod thermistor;

pub use thermistor::*;
