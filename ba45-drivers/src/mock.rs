//! Scripted register file for driver tests

use std::collections::VecDeque;
use std::vec::Vec;

use ba45_hal::{Register, RegisterAccess};

/// One recorded register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(Register, u8),
    Write(Register, u8),
}

/// In-memory register file
///
/// - Plain reads return the stored value.
/// - [`script`](Self::script) queues values returned by the next reads of a
///   register before falling back to the stored value, to simulate status
///   flags that change while a driver polls.
/// - [`self_clearing`](Self::self_clearing) clears bits after a read has
///   observed them, like a hardware busy bit that drops once the cycle ends.
/// - `modify` works on the stored value directly and does not consume
///   scripted reads.
pub struct MockRegisters {
    values: [u8; Register::COUNT],
    scripted: [VecDeque<u8>; Register::COUNT],
    self_clearing: [u8; Register::COUNT],
    log: Vec<Access>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self {
            values: [0; Register::COUNT],
            scripted: core::array::from_fn(|_| VecDeque::new()),
            self_clearing: [0; Register::COUNT],
            log: Vec::new(),
        }
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, reg: Register, value: u8) -> Self {
        self.set(reg, value);
        self
    }

    /// Set a stored value without logging
    pub fn set(&mut self, reg: Register, value: u8) {
        self.values[reg.index()] = value;
    }

    /// Get a stored value without logging
    pub fn get(&self, reg: Register) -> u8 {
        self.values[reg.index()]
    }

    /// Queue values for the next reads of `reg`
    pub fn script(&mut self, reg: Register, reads: &[u8]) {
        self.scripted[reg.index()].extend(reads.iter().copied());
    }

    /// Bits of `reg` cleared once a read has returned them set
    pub fn self_clearing(&mut self, reg: Register, mask: u8) {
        self.self_clearing[reg.index()] |= mask;
    }

    pub fn log(&self) -> &[Access] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Values written to `reg`, in order
    pub fn writes_to(&self, reg: Register) -> Vec<u8> {
        self.log
            .iter()
            .filter_map(|access| match access {
                Access::Write(r, value) if *r == reg => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Number of reads of `reg`
    pub fn reads_of(&self, reg: Register) -> usize {
        self.log
            .iter()
            .filter(|access| matches!(access, Access::Read(r, _) if *r == reg))
            .count()
    }

    /// Position in the log of the first write to `reg`
    pub fn first_write(&self, reg: Register) -> Option<usize> {
        self.log
            .iter()
            .position(|access| matches!(access, Access::Write(r, _) if *r == reg))
    }
}

impl RegisterAccess for MockRegisters {
    fn read(&mut self, reg: Register) -> u8 {
        let i = reg.index();
        let value = self.scripted[i].pop_front().unwrap_or(self.values[i]);
        self.values[i] &= !(value & self.self_clearing[i]);
        self.log.push(Access::Read(reg, value));
        value
    }

    fn write(&mut self, reg: Register, value: u8) {
        self.values[reg.index()] = value;
        self.log.push(Access::Write(reg, value));
    }

    fn modify(&mut self, reg: Register, clear: u8, set: u8) {
        let i = reg.index();
        let value = (self.values[i] & !clear) | set;
        self.values[i] = value;
        self.log.push(Access::Write(reg, value));
    }
}
