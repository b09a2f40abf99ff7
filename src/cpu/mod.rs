//! Instruction Unit
//!
//! A 65xx-flavored processor core. Each `step()` fetches one opcode at the
//! program counter, dispatches it through the descriptor table in
//! [`opcodes`], applies the register/flag mutation, and advances the cycle
//! counter. Unknown opcodes degrade to a minimum-cost no-op; the BRK opcode
//! latches a halt that is reported to the caller instead of raised.

use crate::memory::{MemoryInterface, ROM_BASE};
use log::{log_enabled, trace, Level};
use serde::{Deserialize, Serialize};

pub mod opcodes;

#[cfg(test)]
mod tests_exec;

/// Status flag bits in the P register (NV1BDIZC layout).
pub mod flags {
    pub const CARRY: u8 = 0b0000_0001;       // C - Carry
    pub const ZERO: u8 = 0b0000_0010;        // Z - Zero
    pub const IRQ_DISABLE: u8 = 0b0000_0100; // I - Interrupt disable
    pub const DECIMAL: u8 = 0b0000_1000;     // D - Decimal (not modeled)
    pub const BREAK: u8 = 0b0001_0000;       // B - Break
    pub const UNUSED: u8 = 0b0010_0000;      // Always set on the stack
    pub const OVERFLOW: u8 = 0b0100_0000;    // V - Overflow
    pub const NEGATIVE: u8 = 0b1000_0000;    // N - Negative
}

/// Power-on value of the status register (IRQ disabled, B and unused set).
pub const POWER_ON_STATUS: u8 = 0x34;

/// Power-on value of the stack pointer (top of the hardware stack page).
pub const POWER_ON_SP: u16 = 0x01FF;

/// Cycle cost of the reset sequence, charged once before the first fetch.
/// Modeled as one implicit minimum-cost no-op.
const RESET_CYCLES: u64 = 2;

/// Outcome of a single instruction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction retired normally; stepping may continue.
    Continued,
    /// The unit is halted (BRK); the current step batch must end. The
    /// condition is sticky until a reset.
    Halted,
}

/// Processor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    /// Program counter.
    pub pc: u16,
    /// Accumulator.
    pub a: u8,
    /// Index register X.
    pub x: u8,
    /// Index register Y.
    pub y: u8,
    /// Stack pointer (full 16-bit, grows downward through RAM).
    pub sp: u16,
    /// Status flags.
    pub p: u8,

    /// Cycle counter. Monotonically non-decreasing within a session,
    /// cleared only by an explicit reset.
    pub cycles: u64,

    /// Sticky halt condition (BRK).
    pub halted: bool,

    /// One-shot reset overhead, armed at power-on and by `reset()`.
    reset_pending: bool,
}

impl Cpu {
    /// Power-on state: execution starts at the ROM window base.
    pub fn new() -> Self {
        Self {
            pc: ROM_BASE,
            a: 0,
            x: 0,
            y: 0,
            sp: POWER_ON_SP,
            p: POWER_ON_STATUS,
            cycles: 0,
            halted: false,
            reset_pending: true,
        }
    }

    /// Soft reset: the program counter returns to the entry point and the
    /// cycle counter clears, but `a/x/y/sp/p` survive, matching reset-line
    /// semantics. The reset overhead is re-armed.
    pub fn reset(&mut self) {
        self.pc = ROM_BASE;
        self.cycles = 0;
        self.halted = false;
        self.reset_pending = true;
    }

    /// Execute one instruction: fetch the opcode byte at `pc`, advance `pc`,
    /// dispatch, then add the opcode's cycle cost. A halted unit returns
    /// [`StepOutcome::Halted`] without touching memory.
    pub fn step(&mut self, bus: &mut dyn MemoryInterface) -> StepOutcome {
        if self.halted {
            return StepOutcome::Halted;
        }

        if self.reset_pending {
            self.cycles += RESET_CYCLES;
            self.reset_pending = false;
        }

        if log_enabled!(Level::Trace) {
            trace!(
                "{:04X}  {:<12} a={:02X} x={:02X} y={:02X} p={:02X} cyc={}",
                self.pc,
                opcodes::disassemble(bus, self.pc),
                self.a,
                self.x,
                self.y,
                self.p,
                self.cycles
            );
        }

        let op = bus.read_byte(self.pc);
        self.pc = self.pc.wrapping_add(1);

        let desc = &opcodes::OPCODES[op as usize];
        (desc.exec)(self, bus);
        self.cycles += u64::from(desc.cycles);

        if self.halted {
            StepOutcome::Halted
        } else {
            StepOutcome::Continued
        }
    }

    /// Check a status flag.
    pub fn flag(&self, mask: u8) -> bool {
        self.p & mask != 0
    }

    /// Set or clear a status flag.
    pub fn set_flag(&mut self, mask: u8, set: bool) {
        if set {
            self.p |= mask;
        } else {
            self.p &= !mask;
        }
    }

    /// Update N and Z from a result value.
    pub(crate) fn set_nz(&mut self, value: u8) {
        self.set_flag(flags::ZERO, value == 0);
        self.set_flag(flags::NEGATIVE, value & 0x80 != 0);
    }

    /// Fetch the next operand byte and advance `pc`.
    pub(crate) fn fetch_byte(&mut self, bus: &mut dyn MemoryInterface) -> u8 {
        let value = bus.read_byte(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Fetch a little-endian operand word and advance `pc` by 2.
    pub(crate) fn fetch_word(&mut self, bus: &mut dyn MemoryInterface) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// Push a byte at `sp`, then decrement `sp`.
    pub(crate) fn push(&mut self, bus: &mut dyn MemoryInterface, value: u8) {
        bus.write_byte(self.sp, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Increment `sp`, then read the byte there.
    pub(crate) fn pop(&mut self, bus: &mut dyn MemoryInterface) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read_byte(self.sp)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
