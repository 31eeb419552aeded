//! Persistent byte storage abstractions
//!
//! The BA45F5240 data EEPROM is addressed one byte at a time. There is no
//! wear levelling, batching or integrity check: a write replaces exactly one
//! cell.

/// Number of cells in the data EEPROM
pub const EEPROM_SIZE: usize = 64;

/// Single-byte persistent storage
pub trait ByteStore {
    /// Error type for storage operations
    type Error;

    /// Read the byte stored at `address`
    fn read(&mut self, address: u8) -> Result<u8, Self::Error>;

    /// Store `data` at `address`
    ///
    /// Returns once the write cycle has completed.
    fn write(&mut self, address: u8, data: u8) -> Result<(), Self::Error>;

    /// Number of addressable cells
    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }
}
