//! Console Address Space
//!
//! This module implements the memory map of the console, routing reads
//! and writes to work RAM, the input latch registers, or cartridge ROM.
//!
//! ## Memory Map
//!
//! | Address Range  | Size    | Description                        |
//! |:---------------|:--------|:-----------------------------------|
//! | 0x0000-0x1FFF  | 8 KB    | Work RAM window (128 KB backing)   |
//! | 0x2000-0x4217  | -       | Open bus (reads 0)                 |
//! | 0x4218-0x4219  | 2 B     | Joypad latch (low/high, read-only) |
//! | 0x421A-0x7FFF  | -       | Open bus (reads 0)                 |
//! | 0x8000-0xFFFF  | 32 KB   | Cartridge ROM window               |
//!
//! Out-of-range access is defined, not an error: unmapped reads return 0
//! (floating-bus behavior) and writes outside RAM are silently discarded.

use crate::io::InputLatch;
use std::sync::Arc;

#[cfg(test)]
mod tests_property;

/// Work RAM backing size in bytes.
pub const RAM_SIZE: usize = 128 * 1024;

/// First address past the RAM window (exclusive bound).
pub const RAM_END: u16 = 0x2000;

/// Base address of the cartridge ROM window; also the program entry point.
pub const ROM_BASE: u16 = 0x8000;

/// Joypad latch register, low byte (buttons 0-7).
pub const JOYPAD_LO: u16 = 0x4218;

/// Joypad latch register, high byte (buttons 8-9).
pub const JOYPAD_HI: u16 = 0x4219;

/// Byte-granular memory access, the seam between the instruction unit and
/// whatever backs it (the real bus, or a flat test memory).
pub trait MemoryInterface {
    fn read_byte(&mut self, address: u16) -> u8;
    fn write_byte(&mut self, address: u16, value: u8);
}

/// Console memory bus.
///
/// Owns RAM and ROM and decides, per address, which store (if any) an
/// access lands in.
#[derive(Debug)]
pub struct Bus {
    /// Work RAM. Always allocated and zeroed at creation.
    pub ram: Box<[u8]>,

    /// Cartridge ROM. Empty until a program image is loaded.
    pub rom: Vec<u8>,

    /// Joypad latch, shared with the host side.
    input: Arc<InputLatch>,
}

impl Bus {
    /// Create a bus with zeroed RAM and no cartridge.
    pub fn new(input: Arc<InputLatch>) -> Self {
        Self {
            ram: vec![0; RAM_SIZE].into_boxed_slice(),
            rom: Vec::new(),
            input,
        }
    }

    /// Replace the cartridge ROM wholesale.
    pub fn load_rom(&mut self, data: &[u8]) {
        self.rom = data.to_vec();
    }

    /// Loaded ROM size in bytes.
    pub fn rom_size(&self) -> usize {
        self.rom.len()
    }

    /// Read a byte from the memory map.
    pub fn read_byte(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.ram[address as usize % RAM_SIZE],
            JOYPAD_LO => (self.input.state().bits() & 0xFF) as u8,
            JOYPAD_HI => (self.input.state().bits() >> 8) as u8,
            0x8000..=0xFFFF => {
                let offset = (address - ROM_BASE) as usize;
                if offset < self.rom.len() {
                    self.rom[offset]
                } else {
                    0 // Past the end of the image
                }
            }
            _ => 0, // Open bus
        }
    }

    /// Write a byte to the memory map. Only RAM accepts writes; the latch
    /// registers and ROM are read-only from the CPU side.
    pub fn write_byte(&mut self, address: u16, value: u8) {
        if address < RAM_END {
            self.ram[address as usize % RAM_SIZE] = value;
        }
    }
}

impl MemoryInterface for Bus {
    #[inline(always)]
    fn read_byte(&mut self, address: u16) -> u8 {
        Bus::read_byte(self, address)
    }

    #[inline(always)]
    fn write_byte(&mut self, address: u16, value: u8) {
        Bus::write_byte(self, address, value)
    }
}
