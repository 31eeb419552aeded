//! Serial transceiver (UART mode of the universal serial interface)
//!
//! Blocking byte-in/byte-out over the UART registers. Constructing a
//! [`SerialTransceiver`] programs the baud rate generator and frame format,
//! so every value of the type is a configured device.
//!
//! Receive-side faults are reported in a fixed order: parity, then overrun,
//! then framing. Only the first set flag is cleared and reported, and the
//! data register is left unread; any other latched flags surface on the
//! following calls.

use ba45_core::serial::baud_divisor;
use ba45_hal::registers::{pins, uucr1, uucr2, uucr3, uusr};
use ba45_hal::uart::{BaudPrescaler, DataBits, Parity, StopBits, UartConfig};
use ba45_hal::{wait_until, Register, RegisterAccess, TimedOut, UartRx, UartTx};

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Parity error latched for the received frame
    Parity,
    /// A frame arrived before the previous one was read
    Overrun,
    /// Stop bit not detected
    Framing,
    /// Status flag did not change within the configured poll limit
    Timeout,
    /// Baud rate cannot be produced by the 8-bit divisor
    InvalidBaudRate,
}

impl From<TimedOut> for UartError {
    fn from(_: TimedOut) -> Self {
        UartError::Timeout
    }
}

impl embedded_io::Error for UartError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            UartError::Timeout => embedded_io::ErrorKind::TimedOut,
            UartError::InvalidBaudRate => embedded_io::ErrorKind::InvalidInput,
            UartError::Parity | UartError::Overrun | UartError::Framing => {
                embedded_io::ErrorKind::InvalidData
            }
        }
    }
}

/// Result of one [`SerialTransceiver::receive`] call
pub type ReceiveOutcome = Result<u8, UartError>;

/// Largest word carried by a 9-bit frame
pub const MAX_WORD: u16 = 0x1FF;

/// Line faults in the order they are checked
const LINE_FAULTS: [(u8, UartError); 3] = [
    (uusr::UPERR, UartError::Parity),
    (uusr::UOERR, UartError::Overrun),
    (uusr::UFERR, UartError::Framing),
];

/// Blocking UART driver
pub struct SerialTransceiver<R> {
    regs: R,
    config: UartConfig,
    divisor: u8,
}

impl<R: RegisterAccess> SerialTransceiver<R> {
    /// Configure the UART and enable the transmitter and receiver
    ///
    /// Routes the RX/TX pins, selects UART mode, programs the baud rate
    /// generator and the frame shape. Nothing is read back.
    pub fn new(mut regs: R, config: UartConfig) -> Result<Self, UartError> {
        let divisor = baud_divisor(config.clock_hz, config.prescaler, config.baudrate)
            .ok_or(UartError::InvalidBaudRate)?;

        route_pins(&mut regs);

        regs.set_bits(Register::Uucr3, uucr3::UMD);
        regs.write_bits(
            Register::Uucr2,
            uucr2::UBRGH,
            config.prescaler == BaudPrescaler::Div16,
        );
        regs.write(Register::Ubrg, divisor);

        regs.modify(
            Register::Uucr1,
            uucr1::UBNO | uucr1::UPREN | uucr1::UPRT | uucr1::USTOPS | uucr1::UTXBRK,
            frame_bits(&config) | uucr1::UREN,
        );
        regs.set_bits(Register::Uucr2, uucr2::UTXEN | uucr2::URXEN);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "uart: {=u32} baud, divisor {=u8}, {}",
            config.baudrate,
            divisor,
            config.prescaler
        );

        Ok(Self {
            regs,
            config,
            divisor,
        })
    }

    /// Get the UART configuration
    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    /// Baud rate generator value programmed at construction
    pub fn divisor(&self) -> u8 {
        self.divisor
    }

    /// Give back the register access
    pub fn release(self) -> R {
        self.regs
    }

    /// Send one byte
    ///
    /// Spins until the transmit data register is empty, then writes `byte`.
    /// With the default unbounded poll limit a stuck transmitter never
    /// returns.
    pub fn transmit(&mut self, byte: u8) -> Result<(), UartError> {
        let regs = &mut self.regs;
        wait_until(self.config.poll_limit, || {
            regs.read_bits(Register::Uusr, uusr::UTXIF)
        })?;
        regs.write(Register::UtxrRxr, byte);
        Ok(())
    }

    /// Receive one byte
    ///
    /// Spins until a frame is available, then reports the first latched
    /// line fault (clearing only that flag) or the received byte.
    pub fn receive(&mut self) -> ReceiveOutcome {
        self.wait_for_frame()?;
        Ok(self.regs.read(Register::UtxrRxr))
    }

    /// Send one 9-bit word
    ///
    /// The ninth bit goes to `UTX8` before the low byte is written, since
    /// writing the data register starts the frame. Bits above [`MAX_WORD`]
    /// are dropped. Only meaningful with [`DataBits::Nine`].
    pub fn transmit_word(&mut self, word: u16) -> Result<(), UartError> {
        let regs = &mut self.regs;
        wait_until(self.config.poll_limit, || {
            regs.read_bits(Register::Uusr, uusr::UTXIF)
        })?;
        let [lo, hi] = (word & MAX_WORD).to_le_bytes();
        regs.write_bits(Register::Uucr1, uucr1::UTX8, hi != 0);
        regs.write(Register::UtxrRxr, lo);
        Ok(())
    }

    /// Receive one 9-bit word
    ///
    /// Line faults are reported exactly as for [`receive`](Self::receive).
    /// `URX8` is sampled before the data register, whose read moves the
    /// next frame in.
    pub fn receive_word(&mut self) -> Result<u16, UartError> {
        self.wait_for_frame()?;
        let ninth = self.regs.read_bits(Register::Uucr1, uucr1::URX8);
        let lo = self.regs.read(Register::UtxrRxr);
        Ok(u16::from_le_bytes([lo, ninth as u8]))
    }

    /// Spin until a frame is available and report the first latched fault
    ///
    /// Clears only the reported flag and leaves the data register unread.
    fn wait_for_frame(&mut self) -> Result<(), UartError> {
        let regs = &mut self.regs;
        wait_until(self.config.poll_limit, || {
            regs.read_bits(Register::Uusr, uusr::URXIF)
        })?;

        let status = regs.read(Register::Uusr);
        for (flag, error) in LINE_FAULTS {
            if status & flag != 0 {
                regs.clear_bits(Register::Uusr, flag);
                #[cfg(feature = "defmt")]
                defmt::trace!("uart: line fault {}", error);
                return Err(error);
            }
        }
        Ok(())
    }

    /// Wait until the last frame has left the shift register
    pub fn flush(&mut self) -> Result<(), UartError> {
        let regs = &mut self.regs;
        wait_until(self.config.poll_limit, || {
            regs.read_bits(Register::Uusr, uusr::UTIDLE)
        })?;
        Ok(())
    }

    /// Enable the receiver, transmitter-idle and transmitter-empty interrupts
    pub fn enable_interrupts(&mut self) {
        self.regs
            .set_bits(Register::Uucr2, uucr2::URIE | uucr2::UTIIE | uucr2::UTEIE);
    }

    /// Disable all UART interrupt sources
    pub fn disable_interrupts(&mut self) {
        self.regs
            .clear_bits(Register::Uucr2, uucr2::URIE | uucr2::UTIIE | uucr2::UTEIE);
    }

    /// Transmit break characters while `on` is set
    pub fn set_break(&mut self, on: bool) {
        self.regs.write_bits(Register::Uucr1, uucr1::UTXBRK, on);
    }
}

/// UUCR1 bits for the configured frame shape
fn frame_bits(config: &UartConfig) -> u8 {
    let mut bits = 0;
    if config.data_bits == DataBits::Nine {
        bits |= uucr1::UBNO;
    }
    match config.parity {
        Parity::None => {}
        Parity::Even => bits |= uucr1::UPREN,
        Parity::Odd => bits |= uucr1::UPREN | uucr1::UPRT,
    }
    if config.stop_bits == StopBits::Two {
        bits |= uucr1::USTOPS;
    }
    bits
}

/// PA6 and PB3 as RX inputs (PA6 pulled up), PA3 as TX
fn route_pins<R: RegisterAccess>(regs: &mut R) {
    regs.set_bits(Register::Pac, pins::PA6);
    regs.write_field(Register::Pas1, pins::PAS1_PA6, 0b110);
    regs.set_bits(Register::Papu, pins::PA6);

    regs.set_bits(Register::Pbc, pins::PB3);
    regs.write_field(Register::Pbs0, pins::PBS0_PB3, 0b10);

    regs.write_field(Register::Pas0, pins::PAS0_PA3, 0b00);
    regs.write_field(Register::Pbs0, pins::PBS0_PB1, 0b10);
}

impl<R: RegisterAccess> UartTx for SerialTransceiver<R> {
    type Error = UartError;

    fn write_byte(&mut self, byte: u8) -> Result<(), UartError> {
        self.transmit(byte)
    }
}

impl<R: RegisterAccess> UartRx for SerialTransceiver<R> {
    type Error = UartError;

    fn read_byte(&mut self) -> Result<u8, UartError> {
        self.receive()
    }
}

impl<R> embedded_io::ErrorType for SerialTransceiver<R> {
    type Error = UartError;
}

impl<R: RegisterAccess> embedded_io::Read for SerialTransceiver<R> {
    /// Receives exactly one byte per call
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        match buf.first_mut() {
            Some(slot) => {
                *slot = self.receive()?;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl<R: RegisterAccess> embedded_io::Write for SerialTransceiver<R> {
    /// Transmits exactly one byte per call
    fn write(&mut self, buf: &[u8]) -> Result<usize, UartError> {
        match buf.first() {
            Some(&byte) => {
                self.transmit(byte)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn flush(&mut self) -> Result<(), UartError> {
        SerialTransceiver::flush(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Access, MockRegisters};
    use ba45_hal::PollLimit;
    use proptest::prelude::*;

    fn configured(regs: MockRegisters) -> SerialTransceiver<MockRegisters> {
        let mut uart = SerialTransceiver::new(regs, UartConfig::default()).unwrap();
        uart.regs.clear_log();
        uart
    }

    #[test]
    fn test_init_programs_divisor_and_frame() {
        let uart = SerialTransceiver::new(MockRegisters::new(), UartConfig::default()).unwrap();
        assert_eq!(uart.divisor(), 25);

        let regs = uart.release();
        assert_eq!(regs.get(Register::Ubrg), 25);
        assert_eq!(regs.get(Register::Uucr1), uucr1::UREN);
        assert_eq!(
            regs.get(Register::Uucr2),
            uucr2::UTXEN | uucr2::URXEN | uucr2::UBRGH
        );
        assert_eq!(regs.get(Register::Uucr3), uucr3::UMD);
    }

    #[test]
    fn test_init_routes_pins() {
        let regs = SerialTransceiver::new(MockRegisters::new(), UartConfig::default())
            .unwrap()
            .release();
        assert_eq!(regs.get(Register::Pac), pins::PA6);
        assert_eq!(regs.get(Register::Papu), pins::PA6);
        assert_eq!(regs.get(Register::Pbc), pins::PB3);
        assert_eq!(regs.get(Register::Pas1), 0b0011_0000);
        assert_eq!(regs.get(Register::Pbs0), 0b1000_1000);
    }

    #[test]
    fn test_init_frame_variants() {
        let config = UartConfig {
            baudrate: 1200,
            prescaler: BaudPrescaler::Div64,
            data_bits: DataBits::Nine,
            parity: Parity::Odd,
            stop_bits: StopBits::Two,
            ..UartConfig::default()
        };
        let uart = SerialTransceiver::new(MockRegisters::new(), config).unwrap();
        // round(4_000_000 / (64 * 1200)) - 1 = round(52.08) - 1
        assert_eq!(uart.divisor(), 51);

        let regs = uart.release();
        assert_eq!(
            regs.get(Register::Uucr1),
            uucr1::UREN | uucr1::UBNO | uucr1::UPREN | uucr1::UPRT | uucr1::USTOPS
        );
        assert_eq!(regs.get(Register::Uucr2) & uucr2::UBRGH, 0);

        let even = UartConfig {
            parity: Parity::Even,
            ..UartConfig::default()
        };
        let regs = SerialTransceiver::new(MockRegisters::new(), even)
            .unwrap()
            .release();
        assert_eq!(regs.get(Register::Uucr1), uucr1::UREN | uucr1::UPREN);
    }

    #[test]
    fn test_init_rejects_unreachable_baudrate() {
        let config = UartConfig {
            baudrate: 100,
            prescaler: BaudPrescaler::Div64,
            ..UartConfig::default()
        };
        let result = SerialTransceiver::new(MockRegisters::new(), config);
        assert!(matches!(result, Err(UartError::InvalidBaudRate)));
    }

    #[test]
    fn test_transmit_waits_for_empty_buffer() {
        let mut regs = MockRegisters::new().with(Register::Uusr, uusr::UTXIF);
        let mut uart = configured(regs);
        uart.regs.script(Register::Uusr, &[0, 0, 0]);

        uart.transmit(0x55).unwrap();

        regs = uart.release();
        assert_eq!(regs.reads_of(Register::Uusr), 4);
        // The data write comes after every status poll
        let write = regs.first_write(Register::UtxrRxr).unwrap();
        assert_eq!(write, regs.log().len() - 1);
        assert_eq!(regs.writes_to(Register::UtxrRxr), [0x55]);
    }

    #[test]
    fn test_transmit_times_out() {
        let config = UartConfig {
            poll_limit: PollLimit::attempts(10),
            ..UartConfig::default()
        };
        let mut uart = SerialTransceiver::new(MockRegisters::new(), config).unwrap();

        assert_eq!(uart.transmit(0x55), Err(UartError::Timeout));
        let regs = uart.release();
        assert!(regs.writes_to(Register::UtxrRxr).is_empty());
    }

    #[test]
    fn test_receive_returns_data() {
        let regs = MockRegisters::new()
            .with(Register::Uusr, uusr::URXIF)
            .with(Register::UtxrRxr, 0x41);
        let mut uart = configured(regs);

        assert_eq!(uart.receive(), Ok(0x41));
    }

    #[test]
    fn test_receive_waits_for_data() {
        let regs = MockRegisters::new()
            .with(Register::Uusr, uusr::URXIF)
            .with(Register::UtxrRxr, 0x7e);
        let mut uart = configured(regs);
        uart.regs.script(Register::Uusr, &[0, uusr::UTXIF]);

        assert_eq!(uart.receive(), Ok(0x7e));
        // Two idle polls, the ready poll, then the error check
        assert_eq!(uart.regs.reads_of(Register::Uusr), 4);
    }

    #[test]
    fn test_parity_reported_first_and_only_parity_cleared() {
        let status = uusr::URXIF | uusr::UPERR | uusr::UOERR | uusr::UFERR;
        let regs = MockRegisters::new()
            .with(Register::Uusr, status)
            .with(Register::UtxrRxr, 0x41);
        let mut uart = configured(regs);

        assert_eq!(uart.receive(), Err(UartError::Parity));
        assert_eq!(
            uart.regs.get(Register::Uusr),
            uusr::URXIF | uusr::UOERR | uusr::UFERR
        );
        // The byte is not consumed on error
        assert_eq!(uart.regs.reads_of(Register::UtxrRxr), 0);

        assert_eq!(uart.receive(), Err(UartError::Overrun));
        assert_eq!(uart.receive(), Err(UartError::Framing));
        assert_eq!(uart.receive(), Ok(0x41));
    }

    #[test]
    fn test_framing_alone() {
        let regs = MockRegisters::new().with(Register::Uusr, uusr::URXIF | uusr::UFERR);
        let mut uart = configured(regs);

        assert_eq!(uart.receive(), Err(UartError::Framing));
        assert_eq!(uart.regs.get(Register::Uusr), uusr::URXIF);
        assert!(uart
            .regs
            .log()
            .iter()
            .all(|access| !matches!(access, Access::Read(Register::UtxrRxr, _))));
    }

    #[test]
    fn test_receive_times_out() {
        let config = UartConfig {
            poll_limit: PollLimit::attempts(3),
            ..UartConfig::default()
        };
        let mut uart = SerialTransceiver::new(MockRegisters::new(), config).unwrap();
        assert_eq!(uart.receive(), Err(UartError::Timeout));
    }

    #[test]
    fn test_transmit_word_sets_ninth_bit_before_data() {
        let regs = MockRegisters::new().with(Register::Uusr, uusr::UTXIF);
        let mut uart = configured(regs);

        uart.transmit_word(0x1A5).unwrap();
        let log = uart.regs.log();
        let ninth = log
            .iter()
            .position(|a| matches!(a, Access::Write(Register::Uucr1, v) if v & uucr1::UTX8 != 0))
            .unwrap();
        let data = uart.regs.first_write(Register::UtxrRxr).unwrap();
        assert!(ninth < data);
        assert_eq!(uart.regs.writes_to(Register::UtxrRxr), [0xA5]);
        // The rest of UUCR1 is untouched
        assert_eq!(uart.regs.get(Register::Uucr1), uucr1::UREN | uucr1::UTX8);

        uart.transmit_word(0x05A).unwrap();
        assert_eq!(uart.regs.get(Register::Uucr1) & uucr1::UTX8, 0);
        assert_eq!(uart.regs.writes_to(Register::UtxrRxr), [0xA5, 0x5A]);
    }

    #[test]
    fn test_transmit_word_drops_bits_above_nine() {
        let regs = MockRegisters::new().with(Register::Uusr, uusr::UTXIF);
        let mut uart = configured(regs);

        uart.transmit_word(0xFE42).unwrap();
        assert_eq!(uart.regs.get(Register::Uucr1) & uucr1::UTX8, 0);
        assert_eq!(uart.regs.writes_to(Register::UtxrRxr), [0x42]);
    }

    #[test]
    fn test_receive_word_reads_ninth_bit_first() {
        let regs = MockRegisters::new()
            .with(Register::Uusr, uusr::URXIF)
            .with(Register::Uucr1, uucr1::UREN | uucr1::URX8)
            .with(Register::UtxrRxr, 0x3C);
        let mut uart = configured(regs);

        assert_eq!(uart.receive_word(), Ok(0x13C));
        let log = uart.regs.log();
        let ninth = log
            .iter()
            .position(|a| matches!(a, Access::Read(Register::Uucr1, _)))
            .unwrap();
        let data = log
            .iter()
            .position(|a| matches!(a, Access::Read(Register::UtxrRxr, _)))
            .unwrap();
        assert!(ninth < data);

        uart.regs.set(Register::Uucr1, uucr1::UREN);
        assert_eq!(uart.receive_word(), Ok(0x03C));
    }

    #[test]
    fn test_receive_word_reports_faults() {
        let regs = MockRegisters::new()
            .with(Register::Uusr, uusr::URXIF | uusr::UOERR)
            .with(Register::Uucr1, uucr1::URX8)
            .with(Register::UtxrRxr, 0xFF);
        let mut uart = configured(regs);

        assert_eq!(uart.receive_word(), Err(UartError::Overrun));
        assert_eq!(uart.regs.reads_of(Register::UtxrRxr), 0);
        assert_eq!(uart.receive_word(), Ok(0x1FF));
    }

    #[test]
    fn test_interrupt_enables() {
        let mut uart = configured(MockRegisters::new());
        let all = uucr2::URIE | uucr2::UTIIE | uucr2::UTEIE;

        uart.enable_interrupts();
        assert_eq!(uart.regs.get(Register::Uucr2) & all, all);

        uart.disable_interrupts();
        assert_eq!(uart.regs.get(Register::Uucr2) & all, 0);
        // Transmitter and receiver stay enabled
        assert_ne!(uart.regs.get(Register::Uucr2) & uucr2::UTXEN, 0);
    }

    #[test]
    fn test_break_character() {
        let mut uart = configured(MockRegisters::new());
        uart.set_break(true);
        assert_ne!(uart.regs.get(Register::Uucr1) & uucr1::UTXBRK, 0);
        uart.set_break(false);
        assert_eq!(uart.regs.get(Register::Uucr1) & uucr1::UTXBRK, 0);
    }

    #[test]
    fn test_embedded_io_write_all() {
        use embedded_io::Write;

        let regs = MockRegisters::new().with(Register::Uusr, uusr::UTXIF | uusr::UTIDLE);
        let mut uart = configured(regs);

        uart.write_all(b"OK\r\n").unwrap();
        uart.flush().unwrap();
        assert_eq!(uart.regs.writes_to(Register::UtxrRxr), b"OK\r\n");
    }

    #[test]
    fn test_embedded_io_read_one_byte() {
        use embedded_io::Read;

        let regs = MockRegisters::new()
            .with(Register::Uusr, uusr::URXIF)
            .with(Register::UtxrRxr, 0x33);
        let mut uart = configured(regs);

        let mut buf = [0u8; 4];
        assert_eq!(uart.read(&mut buf), Ok(1));
        assert_eq!(buf[0], 0x33);
        assert_eq!(uart.read(&mut []), Ok(0));
    }

    #[test]
    fn test_error_kinds() {
        use embedded_io::{Error, ErrorKind};

        assert_eq!(UartError::Timeout.kind(), ErrorKind::TimedOut);
        assert_eq!(UartError::Parity.kind(), ErrorKind::InvalidData);
        assert_eq!(UartError::InvalidBaudRate.kind(), ErrorKind::InvalidInput);
    }

    proptest! {
        #[test]
        fn prop_faults_drain_in_priority_order(parity: bool, overrun: bool, framing: bool, data: u8) {
            let mut status = uusr::URXIF;
            let mut expected = std::vec::Vec::new();
            if parity {
                status |= uusr::UPERR;
                expected.push(Err(UartError::Parity));
            }
            if overrun {
                status |= uusr::UOERR;
                expected.push(Err(UartError::Overrun));
            }
            if framing {
                status |= uusr::UFERR;
                expected.push(Err(UartError::Framing));
            }
            expected.push(Ok(data));

            let regs = MockRegisters::new()
                .with(Register::Uusr, status)
                .with(Register::UtxrRxr, data);
            let mut uart = configured(regs);

            for outcome in expected {
                prop_assert_eq!(uart.receive(), outcome);
            }
        }
    }
}
