//! Special-function register model
//!
//! Every register the drivers touch is named by a [`Register`] variant, and
//! the bit layout of each register lives in a submodule named after it.
//! Multi-bit fields are described by a mask and a shift so drivers can use
//! [`RegisterAccess::modify`] without open-coding the arithmetic.

/// Special-function registers used by the drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    // Port A / port B direction, pull-up and pin-share selection
    Pac,
    Papu,
    Pas0,
    Pas1,
    Pbc,
    Pbs0,
    /// Input source pin selection
    Ifs0,

    // Universal serial interface in UART mode
    Uucr1,
    Uucr2,
    Uucr3,
    Uusr,
    /// Shared transmit/receive data register
    UtxrRxr,
    Ubrg,

    // Data EEPROM, reached through indirect addressing
    Eea,
    Eed,
    Mp1l,
    Mp1h,
    Iar1,

    // Interrupt control
    Intc0,
    Intc1,
    Intc2,
    Intc3,

    // Time bases
    Pscr,
    Tb0c,
    Tb1c,

    // Periodic timer module
    Ptmc0,
    Ptmc1,
    Ptmc2,
    Ptmdl,
    Ptmdh,
    Ptmal,
    Ptmah,
    Ptmbl,
    Ptmbh,
    Ptmrpl,
    Ptmrph,

    // Standard timer module
    Stmc0,
    Stmc1,
    Stmdl,
    Stmdh,
    Stmal,
    Stmah,
}

impl Register {
    /// Number of modelled registers
    pub const COUNT: usize = 42;

    /// Every modelled register, in declaration order
    pub const ALL: [Register; Self::COUNT] = [
        Register::Pac,
        Register::Papu,
        Register::Pas0,
        Register::Pas1,
        Register::Pbc,
        Register::Pbs0,
        Register::Ifs0,
        Register::Uucr1,
        Register::Uucr2,
        Register::Uucr3,
        Register::Uusr,
        Register::UtxrRxr,
        Register::Ubrg,
        Register::Eea,
        Register::Eed,
        Register::Mp1l,
        Register::Mp1h,
        Register::Iar1,
        Register::Intc0,
        Register::Intc1,
        Register::Intc2,
        Register::Intc3,
        Register::Pscr,
        Register::Tb0c,
        Register::Tb1c,
        Register::Ptmc0,
        Register::Ptmc1,
        Register::Ptmc2,
        Register::Ptmdl,
        Register::Ptmdh,
        Register::Ptmal,
        Register::Ptmah,
        Register::Ptmbl,
        Register::Ptmbh,
        Register::Ptmrpl,
        Register::Ptmrph,
        Register::Stmc0,
        Register::Stmc1,
        Register::Stmdl,
        Register::Stmdh,
        Register::Stmal,
        Register::Stmah,
    ];

    /// Position of this register in [`Register::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A multi-bit field inside an 8-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Mask of the field, already shifted into position
    pub mask: u8,
    /// Bit position of the field's least significant bit
    pub shift: u8,
}

impl Field {
    /// Create a field of `width` bits starting at bit `shift`
    pub const fn new(shift: u8, width: u8) -> Self {
        Self {
            mask: (((1u16 << width) - 1) as u8) << shift,
            shift,
        }
    }

    /// Place `value` into the field, discarding bits that do not fit
    pub const fn encode(self, value: u8) -> u8 {
        (value << self.shift) & self.mask
    }

    /// Extract the field from a register value
    pub const fn decode(self, register: u8) -> u8 {
        (register & self.mask) >> self.shift
    }
}

/// Typed access to the special-function register file
///
/// Implementations on the target perform volatile accesses to the
/// memory-mapped registers; test doubles can script flag sequences.
/// Only [`read`](Self::read) and [`write`](Self::write) are required.
pub trait RegisterAccess {
    /// Read the current value of a register
    fn read(&mut self, reg: Register) -> u8;

    /// Write a value to a register
    fn write(&mut self, reg: Register, value: u8);

    /// Read-modify-write: clear `clear` bits, then set `set` bits
    fn modify(&mut self, reg: Register, clear: u8, set: u8) {
        let value = self.read(reg);
        self.write(reg, (value & !clear) | set);
    }

    /// Set the bits in `mask`
    fn set_bits(&mut self, reg: Register, mask: u8) {
        self.modify(reg, 0, mask);
    }

    /// Clear the bits in `mask`
    fn clear_bits(&mut self, reg: Register, mask: u8) {
        self.modify(reg, mask, 0);
    }

    /// Set or clear the bits in `mask` depending on `on`
    fn write_bits(&mut self, reg: Register, mask: u8, on: bool) {
        if on {
            self.set_bits(reg, mask);
        } else {
            self.clear_bits(reg, mask);
        }
    }

    /// Write `value` into a multi-bit field, leaving other bits untouched
    fn write_field(&mut self, reg: Register, field: Field, value: u8) {
        self.modify(reg, field.mask, field.encode(value));
    }

    /// Check whether any bit of `mask` is set
    fn read_bits(&mut self, reg: Register, mask: u8) -> bool {
        self.read(reg) & mask != 0
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    fn read(&mut self, reg: Register) -> u8 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Register, value: u8) {
        (**self).write(reg, value)
    }

    fn modify(&mut self, reg: Register, clear: u8, set: u8) {
        (**self).modify(reg, clear, set)
    }
}

/// UART control register 1
pub mod uucr1 {
    /// UART function enable
    pub const UREN: u8 = 1 << 7;
    /// 9-bit data word select
    pub const UBNO: u8 = 1 << 6;
    /// Parity enable
    pub const UPREN: u8 = 1 << 5;
    /// Parity type (1 = odd)
    pub const UPRT: u8 = 1 << 4;
    /// Two stop bits select
    pub const USTOPS: u8 = 1 << 3;
    /// Transmit break character
    pub const UTXBRK: u8 = 1 << 2;
    /// Ninth received bit
    pub const URX8: u8 = 1 << 1;
    /// Ninth transmitted bit
    pub const UTX8: u8 = 1 << 0;
}

/// UART control register 2
pub mod uucr2 {
    /// Transmitter enable
    pub const UTXEN: u8 = 1 << 7;
    /// Receiver enable
    pub const URXEN: u8 = 1 << 6;
    /// High-speed baud rate generator (divide by 16 instead of 64)
    pub const UBRGH: u8 = 1 << 5;
    /// Receiver interrupt enable
    pub const URIE: u8 = 1 << 2;
    /// Transmitter idle interrupt enable
    pub const UTIIE: u8 = 1 << 1;
    /// Transmitter empty interrupt enable
    pub const UTEIE: u8 = 1 << 0;
}

/// UART control register 3
pub mod uucr3 {
    /// Serial interface mode (1 = UART, 0 = SPI/I2C)
    pub const UMD: u8 = 1 << 0;
}

/// UART status register
///
/// The error flags are sticky: they stay set until software clears them.
pub mod uusr {
    /// Parity error
    pub const UPERR: u8 = 1 << 7;
    /// Framing error
    pub const UFERR: u8 = 1 << 5;
    /// Overrun error
    pub const UOERR: u8 = 1 << 4;
    /// Receive data available
    pub const URXIF: u8 = 1 << 2;
    /// Transmission idle
    pub const UTIDLE: u8 = 1 << 1;
    /// Transmit data register empty
    pub const UTXIF: u8 = 1 << 0;
}

/// Pin-share and port bits touched when routing the UART
pub mod pins {
    use super::Field;

    /// PA6 direction / pull-up bit in PAC and PAPU
    pub const PA6: u8 = 1 << 6;
    /// PB3 direction bit in PBC
    pub const PB3: u8 = 1 << 3;
    /// PA6 pin-share field in PAS1
    pub const PAS1_PA6: Field = Field::new(3, 3);
    /// PA3 pin-share field in PAS0
    pub const PAS0_PA3: Field = Field::new(6, 2);
    /// PB1 pin-share field in PBS0
    pub const PBS0_PB1: Field = Field::new(2, 2);
    /// PB3 pin-share field in PBS0
    pub const PBS0_PB3: Field = Field::new(6, 2);
    /// PTM capture input pin selection field in IFS0
    pub const IFS0_PTPI: Field = Field::new(6, 2);
}

/// Data EEPROM control register, reached through IAR1 once MP1 points at it
pub mod eec {
    /// Indirect address of the EEPROM control register (MP1L)
    pub const POINTER: u8 = 0x40;
    /// Sector of the EEPROM control register (MP1H)
    pub const SECTOR: u8 = 0x01;
    /// Write enable
    pub const WREN: u8 = 1 << 3;
    /// Start write cycle; cleared by hardware when the write completes
    pub const WR: u8 = 1 << 2;
    /// Read enable
    pub const RDEN: u8 = 1 << 1;
    /// Start read cycle; cleared by hardware when the read completes
    pub const RD: u8 = 1 << 0;
}

/// Interrupt control registers
///
/// INTC0..INTC3 each hold up to four enable bits in the low nibble and the
/// matching request flags in the high nibble. INTC0 bit 0 is the global
/// interrupt enable, which has no flag.
pub mod intc {
    /// Global interrupt enable (INTC0)
    pub const EMI: u8 = 1 << 0;

    /// Distance between an enable bit and its request flag
    pub const FLAG_SHIFT: u8 = 4;
}

/// Time base prescaler and control registers
pub mod tbc {
    use super::Field;

    /// Prescaler clock source field in PSCR
    pub const CLKSEL: Field = Field::new(0, 2);
    /// Time base on/off in TB0C/TB1C
    pub const TBON: u8 = 1 << 7;
    /// Time-out period field in TB0C/TB1C
    pub const PERIOD: Field = Field::new(0, 3);
}

/// Timer module control registers shared by PTM and STM
///
/// Both modules use the same layout in their C0/C1 registers; STM places its
/// CCRP period in the low three bits of STMC0.
pub mod tmc {
    use super::Field;

    /// Counter pause (C0)
    pub const PAU: u8 = 1 << 7;
    /// Counter clock select (C0)
    pub const CK: Field = Field::new(4, 3);
    /// Counter on/off (C0)
    pub const ON: u8 = 1 << 3;
    /// STM CCRP period (STMC0)
    pub const RP: Field = Field::new(0, 3);

    /// Operating mode (C1)
    pub const MODE: Field = Field::new(6, 2);
    /// External pin function (C1)
    pub const IO: Field = Field::new(4, 2);
    /// Output control (C1)
    pub const OC: u8 = 1 << 3;
    /// Output polarity (C1)
    pub const POL: u8 = 1 << 2;
    /// PTM capture trigger source / STM PWM duty-period select (C1)
    pub const CAPTS_DPX: u8 = 1 << 1;
    /// Compare-match counter clear source (C1)
    pub const CCLR: u8 = 1 << 0;

    /// PTM capture-mode counter clear condition (PTMC2)
    pub const TCLR: Field = Field::new(0, 2);
    /// PTM counter value latch edge (PTMC2)
    pub const VLF: u8 = 1 << 2;

    /// High byte mask of a 10-bit counter or comparator
    pub const HIGH_MASK: u8 = 0x03;
}
