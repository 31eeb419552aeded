//! UART serial communication abstractions
//!
//! Provides blocking single-byte traits and the frame configuration used by
//! the serial transceiver driver.

use crate::poll::PollLimit;

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write one byte to the UART
    ///
    /// Blocks until the transmit data register is free.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write every byte of `data` in order
    fn write_all_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read a single byte from the UART
    ///
    /// Blocks until a byte has been received or a line error is reported.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// System clock feeding the baud rate generator, in Hz
    pub clock_hz: u32,
    /// Baud rate generator speed
    pub prescaler: BaudPrescaler,
    /// Number of data bits per frame
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// How long transmit/receive may spin on the status register
    pub poll_limit: PollLimit,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            clock_hz: 4_000_000,
            prescaler: BaudPrescaler::Div16,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            poll_limit: PollLimit::Unbounded,
        }
    }
}

/// Baud rate generator prescaler
///
/// The generator produces `clock / (prescaler * (divisor + 1))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudPrescaler {
    /// Divide by 16 (UBRGH set)
    Div16,
    /// Divide by 64 (UBRGH clear)
    Div64,
}

impl BaudPrescaler {
    /// The constant the clock is divided by
    pub const fn factor(self) -> u32 {
        match self {
            BaudPrescaler::Div16 => 16,
            BaudPrescaler::Div64 => 64,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
