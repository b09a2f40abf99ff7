//! Argent - a cycle-stepping core for a small 65xx-flavored fantasy console
//!
//! This library provides the emulation components: CPU, bus, frame
//! generator, input latch, and the session and scheduler that tie them
//! together. 256x224 RGB888 output, 128 KiB work RAM, one ROM window.

pub mod cpu;
pub mod input;
pub mod io;
pub mod machine;
pub mod memory;
pub mod ppu;
pub mod rom;
pub mod scheduler;
pub mod screenshot;

pub use cpu::Cpu;
pub use io::{Buttons, InputLatch};
pub use machine::{Machine, Snapshot};
pub use memory::Bus;
pub use scheduler::Scheduler;
