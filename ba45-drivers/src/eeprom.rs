//! Data EEPROM driver
//!
//! The EEPROM control register (EEC) lives in sector 1 of the data memory
//! and is only reachable through the MP1L/MP1H pointer pair and the IAR1
//! indirect register. Each access points MP1 at EEC, drives the cycle, and
//! restores MP1H to sector 0 before returning.

use ba45_hal::eeprom::EEPROM_SIZE;
use ba45_hal::registers::eec;
use ba45_hal::{wait_until, ByteStore, PollLimit, Register, RegisterAccess, TimedOut};

/// Error from EEPROM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Address is not below the EEPROM size
    AddressOutOfRange,
    /// The read or write cycle did not finish within the poll limit
    Timeout,
}

impl From<TimedOut> for EepromError {
    fn from(_: TimedOut) -> Self {
        EepromError::Timeout
    }
}

/// Blocking single-byte EEPROM access
pub struct Eeprom<R> {
    regs: R,
    poll_limit: PollLimit,
}

impl<R: RegisterAccess> Eeprom<R> {
    /// Create a driver that waits for cycles indefinitely
    pub fn new(regs: R) -> Self {
        Self::with_poll_limit(regs, PollLimit::Unbounded)
    }

    pub fn with_poll_limit(regs: R, poll_limit: PollLimit) -> Self {
        Self { regs, poll_limit }
    }

    pub fn release(self) -> R {
        self.regs
    }

    /// Write one byte and wait for the write cycle to end
    pub fn write(&mut self, address: u8, data: u8) -> Result<(), EepromError> {
        check_address(address)?;

        self.regs.write(Register::Eea, address);
        self.regs.write(Register::Eed, data);
        self.select_control();

        self.regs.set_bits(Register::Iar1, eec::WREN);
        self.regs.set_bits(Register::Iar1, eec::WR);
        let done = self.wait_clear(eec::WR);

        self.regs.write(Register::Mp1h, 0);
        if done.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("eeprom: write to {=u8} timed out", address);
        }
        done
    }

    /// Read one byte
    pub fn read(&mut self, address: u8) -> Result<u8, EepromError> {
        check_address(address)?;

        self.regs.write(Register::Eea, address);
        self.select_control();

        self.regs.set_bits(Register::Iar1, eec::RDEN);
        self.regs.set_bits(Register::Iar1, eec::RD);
        let done = self.wait_clear(eec::RD);

        self.regs.write(Register::Iar1, 0);
        self.regs.write(Register::Mp1h, 0);
        done?;

        Ok(self.regs.read(Register::Eed))
    }

    /// Point MP1 at the EEC register
    fn select_control(&mut self) {
        self.regs.write(Register::Mp1l, eec::POINTER);
        self.regs.write(Register::Mp1h, eec::SECTOR);
    }

    fn wait_clear(&mut self, bit: u8) -> Result<(), EepromError> {
        let regs = &mut self.regs;
        wait_until(self.poll_limit, || !regs.read_bits(Register::Iar1, bit))?;
        Ok(())
    }
}

fn check_address(address: u8) -> Result<(), EepromError> {
    if usize::from(address) < EEPROM_SIZE {
        Ok(())
    } else {
        Err(EepromError::AddressOutOfRange)
    }
}

impl<R: RegisterAccess> ByteStore for Eeprom<R> {
    type Error = EepromError;

    fn read(&mut self, address: u8) -> Result<u8, EepromError> {
        Eeprom::read(self, address)
    }

    fn write(&mut self, address: u8, data: u8) -> Result<(), EepromError> {
        Eeprom::write(self, address, data)
    }
}
