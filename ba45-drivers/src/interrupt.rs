//! Interrupt vector table
//!
//! The BA45F5240 has 14 fixed vectors. Each one has an enable bit in the low
//! nibble and a request flag in the high nibble of one of INTC0..INTC3:
//!
//! ```text
//!          bit3      bit2      bit1      bit0
//! INTC0    INT1E     INT0E     PLTC0E    EMI
//! INTC1    DEE       ADE       LVE       USIME
//! INTC2    STMAE     STMPE     PTMAE     PTMPE
//! INTC3    -         PLTC1E    TB1E      TB0E
//! ```
//!
//! [`InterruptController`] keeps a table of [`VectorEntry`] in priority
//! order, mirrors enable changes into the registers and dispatches pending
//! requests to optional `fn()` hooks.

use ba45_hal::registers::intc;
use ba45_hal::{Register, RegisterAccess};

/// Interrupt handler hook
pub type Handler = fn();

/// Number of interrupt vectors
pub const VECTOR_COUNT: usize = 14;

/// Interrupt source, in priority order (first is highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vector {
    PltComparator0,
    ExternalPin0,
    ExternalPin1,
    /// Universal serial interface (UART/SPI/I2C)
    SerialInterface,
    LowVoltage,
    Adc,
    Eeprom,
    PtmCompareP,
    PtmCompareA,
    StmCompareP,
    StmCompareA,
    TimeBase0,
    TimeBase1,
    PltComparator1,
}

impl Vector {
    /// Every vector, highest priority first
    pub const ALL: [Vector; VECTOR_COUNT] = [
        Vector::PltComparator0,
        Vector::ExternalPin0,
        Vector::ExternalPin1,
        Vector::SerialInterface,
        Vector::LowVoltage,
        Vector::Adc,
        Vector::Eeprom,
        Vector::PtmCompareP,
        Vector::PtmCompareA,
        Vector::StmCompareP,
        Vector::StmCompareA,
        Vector::TimeBase0,
        Vector::TimeBase1,
        Vector::PltComparator1,
    ];

    /// Priority level, 0 is the highest
    pub const fn priority(self) -> u8 {
        self as u8
    }

    /// Program memory address of the vector
    pub const fn address(self) -> u8 {
        0x04 + 4 * self.priority()
    }

    /// Look a vector up by its program memory address
    pub fn from_address(address: u8) -> Option<Vector> {
        Vector::ALL.into_iter().find(|v| v.address() == address)
    }

    /// Control register holding the enable bit and request flag
    pub const fn register(self) -> Register {
        match self {
            Vector::PltComparator0 | Vector::ExternalPin0 | Vector::ExternalPin1 => {
                Register::Intc0
            }
            Vector::SerialInterface | Vector::LowVoltage | Vector::Adc | Vector::Eeprom => {
                Register::Intc1
            }
            Vector::PtmCompareP
            | Vector::PtmCompareA
            | Vector::StmCompareP
            | Vector::StmCompareA => Register::Intc2,
            Vector::TimeBase0 | Vector::TimeBase1 | Vector::PltComparator1 => Register::Intc3,
        }
    }

    /// Enable bit mask within [`register`](Self::register)
    pub const fn enable_mask(self) -> u8 {
        let bit = match self {
            Vector::PltComparator0 => 1,
            Vector::ExternalPin0 => 2,
            Vector::ExternalPin1 => 3,
            Vector::SerialInterface => 0,
            Vector::LowVoltage => 1,
            Vector::Adc => 2,
            Vector::Eeprom => 3,
            Vector::PtmCompareP => 0,
            Vector::PtmCompareA => 1,
            Vector::StmCompareP => 2,
            Vector::StmCompareA => 3,
            Vector::TimeBase0 => 0,
            Vector::TimeBase1 => 1,
            Vector::PltComparator1 => 2,
        };
        1 << bit
    }

    /// Request flag mask within [`register`](Self::register)
    pub const fn flag_mask(self) -> u8 {
        self.enable_mask() << intc::FLAG_SHIFT
    }
}

/// Error from interrupt table operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptError {
    /// No vector lives at the given address
    UnknownVector(u8),
}

/// Which vectors are enabled at start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptConfig {
    /// Global interrupt enable (EMI)
    pub global_enable: bool,
    /// Per-vector enable, indexed by priority
    pub enabled: [bool; VECTOR_COUNT],
}

impl InterruptConfig {
    /// Global enable on, every vector off
    pub const fn none() -> Self {
        Self {
            global_enable: true,
            enabled: [false; VECTOR_COUNT],
        }
    }

    /// Builder: enable `vector`
    pub const fn enable(mut self, vector: Vector) -> Self {
        self.enabled[vector.priority() as usize] = true;
        self
    }

    pub fn is_enabled(&self, vector: Vector) -> bool {
        self.enabled[vector.priority() as usize]
    }
}

impl Default for InterruptConfig {
    /// Both PLT comparators and both PTM compare matches
    fn default() -> Self {
        Self::none()
            .enable(Vector::PltComparator0)
            .enable(Vector::PltComparator1)
            .enable(Vector::PtmCompareP)
            .enable(Vector::PtmCompareA)
    }
}

/// One slot of the vector table
#[derive(Debug, Clone, Copy)]
pub struct VectorEntry {
    pub vector: Vector,
    pub enabled: bool,
    pub handler: Option<Handler>,
}

/// Interrupt vector table bound to the INTC registers
pub struct InterruptController<R> {
    regs: R,
    global_enable: bool,
    table: [VectorEntry; VECTOR_COUNT],
}

impl<R: RegisterAccess> InterruptController<R> {
    /// Build the table from `config`; registers are untouched until
    /// [`init`](Self::init)
    pub fn new(regs: R, config: InterruptConfig) -> Self {
        let table = Vector::ALL.map(|vector| VectorEntry {
            vector,
            enabled: config.is_enabled(vector),
            handler: None,
        });
        Self {
            regs,
            global_enable: config.global_enable,
            table,
        }
    }

    /// Write the global enable and every vector's enable bit
    pub fn init(&mut self) {
        self.regs
            .write_bits(Register::Intc0, intc::EMI, self.global_enable);
        for entry in self.table {
            self.regs.write_bits(
                entry.vector.register(),
                entry.vector.enable_mask(),
                entry.enabled,
            );
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "interrupts: global {=bool}, {=usize} vectors enabled",
            self.global_enable,
            self.table.iter().filter(|e| e.enabled).count()
        );
    }

    /// Enable the vector at program address `address`
    pub fn enable(&mut self, address: u8) -> Result<Vector, InterruptError> {
        let vector = lookup(address)?;
        self.enable_vector(vector);
        Ok(vector)
    }

    /// Disable the vector at program address `address`
    pub fn disable(&mut self, address: u8) -> Result<Vector, InterruptError> {
        let vector = lookup(address)?;
        self.disable_vector(vector);
        Ok(vector)
    }

    pub fn enable_vector(&mut self, vector: Vector) {
        self.set_enabled(vector, true);
    }

    pub fn disable_vector(&mut self, vector: Vector) {
        self.set_enabled(vector, false);
    }

    fn set_enabled(&mut self, vector: Vector, enabled: bool) {
        self.entry_mut(vector).enabled = enabled;
        self.regs
            .write_bits(vector.register(), vector.enable_mask(), enabled);
    }

    /// Install the hook called when `vector` is serviced
    pub fn set_handler(&mut self, vector: Vector, handler: Handler) {
        self.entry_mut(vector).handler = Some(handler);
    }

    pub fn clear_handler(&mut self, vector: Vector) {
        self.entry_mut(vector).handler = None;
    }

    pub fn is_enabled(&self, vector: Vector) -> bool {
        self.table[vector.priority() as usize].enabled
    }

    /// Read the request flag of `vector`
    pub fn is_pending(&mut self, vector: Vector) -> bool {
        self.regs.read_bits(vector.register(), vector.flag_mask())
    }

    pub fn clear_pending(&mut self, vector: Vector) {
        self.regs.clear_bits(vector.register(), vector.flag_mask());
    }

    /// Switch the global interrupt enable (EMI)
    pub fn set_global(&mut self, enable: bool) {
        self.global_enable = enable;
        self.regs.write_bits(Register::Intc0, intc::EMI, enable);
    }

    pub fn global_enabled(&self) -> bool {
        self.global_enable
    }

    /// The vector table in priority order
    pub fn table(&self) -> &[VectorEntry; VECTOR_COUNT] {
        &self.table
    }

    /// Service the highest priority request
    ///
    /// Among enabled vectors with their request flag set, the one with the
    /// highest priority has its flag cleared and its handler called. The
    /// global enable is not consulted, so this also works for polled
    /// operation with EMI off.
    pub fn service_pending(&mut self) -> Option<Vector> {
        let mut flags = [0u8; 4];
        for (i, reg) in [
            Register::Intc0,
            Register::Intc1,
            Register::Intc2,
            Register::Intc3,
        ]
        .into_iter()
        .enumerate()
        {
            flags[i] = self.regs.read(reg);
        }

        let entry = self.table.iter().copied().find(|entry| {
            let vector = entry.vector;
            let index = vector.register().index() - Register::Intc0.index();
            entry.enabled && flags[index] & vector.flag_mask() != 0
        })?;

        self.clear_pending(entry.vector);
        #[cfg(feature = "defmt")]
        defmt::trace!("interrupts: servicing {}", entry.vector);
        if let Some(handler) = entry.handler {
            handler();
        }
        Some(entry.vector)
    }

    /// Call the handler of `vector`, if one is installed
    ///
    /// For use from the hardware vector itself, which clears the flag on
    /// entry.
    pub fn dispatch(&self, vector: Vector) -> bool {
        match self.table[vector.priority() as usize].handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn release(self) -> R {
        self.regs
    }

    fn entry_mut(&mut self, vector: Vector) -> &mut VectorEntry {
        &mut self.table[vector.priority() as usize]
    }
}

fn lookup(address: u8) -> Result<Vector, InterruptError> {
    Vector::from_address(address).ok_or(InterruptError::UnknownVector(address))
}
