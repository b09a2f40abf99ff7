//! Machine session.
//!
//! [`Machine`] owns every component (CPU, bus, frame generator, input
//! latch) and advances emulation one whole frame at a time. All state
//! mutation funnels through `&mut self` here; the only piece shared with
//! other threads is the input latch, which is atomic.
//!
//! A [`Snapshot`] captures CPU registers, work RAM, and the frame counter.
//! The ROM image and framebuffer are deliberately outside it: the ROM is
//! the cartridge (restoring assumes the same one is loaded), and the
//! framebuffer is reproducible from the frame counter alone.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::cpu::{Cpu, StepOutcome};
use crate::io::{Buttons, InputLatch};
use crate::memory::{Bus, RAM_SIZE};
use crate::ppu::Ppu;

/// Nominal display rate in frames per second.
pub const FRAME_RATE: u32 = 60;

/// Cycle budget per frame: a 1.79 MHz master clock sliced at 60 Hz.
/// An instruction may straddle the boundary; the overshoot carries into
/// the next frame because the budget is a running cycle target.
pub const CYCLES_PER_FRAME: u64 = 29_780;

/// Number of in-memory save-state slots.
pub const SAVE_SLOTS: usize = 10;

/// Full machine state needed to resume execution later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub cpu: Cpu,
    pub ram: Vec<u8>,
    pub frame_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Slot index outside `0..SAVE_SLOTS`.
    BadSlot(u8),
    /// Nothing saved in that slot yet.
    EmptySlot(u8),
    /// Snapshot RAM length does not match this machine's RAM.
    SizeMismatch { expected: usize, found: usize },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::BadSlot(slot) => {
                write!(f, "save slot {} out of range (0-{})", slot, SAVE_SLOTS - 1)
            }
            SnapshotError::EmptySlot(slot) => write!(f, "save slot {} is empty", slot),
            SnapshotError::SizeMismatch { expected, found } => {
                write!(
                    f,
                    "snapshot RAM is {} bytes, machine has {}",
                    found, expected
                )
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

/// One emulated console. Single-owner: callers drive it from one place
/// and hand out only the input latch.
pub struct Machine {
    pub cpu: Cpu,
    pub bus: Bus,
    ppu: Ppu,
    input: Arc<InputLatch>,
    frame_count: u64,
    rom_loaded: bool,
    halt_reported: bool,
    save_states: [Option<Snapshot>; SAVE_SLOTS],
}

impl Machine {
    pub fn new() -> Self {
        let input = Arc::new(InputLatch::new());
        Machine {
            cpu: Cpu::new(),
            bus: Bus::new(Arc::clone(&input)),
            ppu: Ppu::new(),
            input,
            frame_count: 0,
            rom_loaded: false,
            halt_reported: false,
            save_states: Default::default(),
        }
    }

    /// Insert a cartridge. This is a full power-on: RAM is cleared, the
    /// CPU returns to its power-on state, and the frame counter restarts.
    pub fn load_rom(&mut self, data: &[u8]) {
        self.bus.ram.fill(0);
        self.bus.load_rom(data);
        self.cpu = Cpu::new();
        self.ppu = Ppu::new();
        self.frame_count = 0;
        self.halt_reported = false;
        self.rom_loaded = true;
        info!("loaded ROM: {} bytes", data.len());
    }

    /// Soft reset: execution restarts from the reset target but RAM and
    /// the CPU's data registers survive, as on real hardware.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.frame_count = 0;
        self.halt_reported = false;
        info!("machine reset");
    }

    /// Advance one frame: run the CPU up to the frame's cycle target,
    /// then repaint. Returns the new framebuffer, or `None` while no ROM
    /// is loaded (the frame counter does not move either).
    ///
    /// A halted CPU stops consuming cycles but frames keep rendering, so
    /// a crashed program still shows its last animation state.
    pub fn run_frame(&mut self) -> Option<&[u8]> {
        if !self.rom_loaded {
            return None;
        }

        let target = self.cpu.cycles + CYCLES_PER_FRAME;
        while self.cpu.cycles < target {
            if self.cpu.step(&mut self.bus) == StepOutcome::Halted {
                if !self.halt_reported {
                    warn!(
                        "CPU halted at pc={:#06X}; rendering continues without execution",
                        self.cpu.pc
                    );
                    self.halt_reported = true;
                }
                break;
            }
        }

        self.ppu.render_frame(self.frame_count);
        self.frame_count += 1;
        Some(self.ppu.framebuffer())
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn rom_loaded(&self) -> bool {
        self.rom_loaded
    }

    /// The most recently rendered image (black before the first frame).
    pub fn framebuffer(&self) -> &[u8] {
        self.ppu.framebuffer()
    }

    /// Shared handle to the input latch, safe to hand to another thread.
    pub fn input_latch(&self) -> Arc<InputLatch> {
        Arc::clone(&self.input)
    }

    /// Replace the current pad state wholesale.
    pub fn set_input(&self, buttons: Buttons) {
        self.input.set_state(buttons);
    }

    /// Capture the resumable state of the machine.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cpu: self.cpu.clone(),
            ram: self.bus.ram.to_vec(),
            frame_count: self.frame_count,
            created_at: Utc::now(),
        }
    }

    /// Rewind to a snapshot. Validates the RAM length before touching any
    /// machine state, so a failed restore leaves the session unchanged.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.ram.len() != RAM_SIZE {
            return Err(SnapshotError::SizeMismatch {
                expected: RAM_SIZE,
                found: snapshot.ram.len(),
            });
        }
        self.cpu = snapshot.cpu.clone();
        self.bus.ram.copy_from_slice(&snapshot.ram);
        self.frame_count = snapshot.frame_count;
        self.halt_reported = false;
        Ok(())
    }

    /// Store the current state in an in-memory slot.
    pub fn save_state(&mut self, slot: u8) -> Result<(), SnapshotError> {
        let index = usize::from(slot);
        if index >= SAVE_SLOTS {
            return Err(SnapshotError::BadSlot(slot));
        }
        self.save_states[index] = Some(self.snapshot());
        info!("state saved to slot {}", slot);
        Ok(())
    }

    /// Restore from an in-memory slot.
    pub fn load_state(&mut self, slot: u8) -> Result<(), SnapshotError> {
        let index = usize::from(slot);
        if index >= SAVE_SLOTS {
            return Err(SnapshotError::BadSlot(slot));
        }
        let snapshot = self.save_states[index]
            .take()
            .ok_or(SnapshotError::EmptySlot(slot))?;
        let result = self.restore(&snapshot);
        self.save_states[index] = Some(snapshot);
        result?;
        info!("state loaded from slot {}", slot);
        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
