//! Joypad Input
//!
//! This module implements the console's input latch: a single shared word
//! holding the most recent button bitmask written by the host. The latch
//! has no event queue — if the host writes twice between machine reads,
//! only the latest value is observed, matching real controller polling.
//!
//! ## Button Bit Assignments
//!
//! | Bit    | Mask   | Button  |
//! |:-------|:-------|:--------|
//! | 0      | 0x0001 | A       |
//! | 1      | 0x0002 | B       |
//! | 2      | 0x0004 | X       |
//! | 3      | 0x0008 | Y       |
//! | 4      | 0x0010 | Start   |
//! | 5      | 0x0020 | Select  |
//! | 6      | 0x0040 | Up      |
//! | 7      | 0x0080 | Down    |
//! | 8      | 0x0100 | Left    |
//! | 9      | 0x0200 | Right   |
//!
//! The CPU sees the latch through the bus at `JOYPAD_LO`/`JOYPAD_HI`.

use std::fmt;
use std::sync::atomic::{AtomicU16, Ordering};

/// Button bitmask for the 10-button pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(u16);

impl Buttons {
    pub const A: Buttons = Buttons(0x0001);
    pub const B: Buttons = Buttons(0x0002);
    pub const X: Buttons = Buttons(0x0004);
    pub const Y: Buttons = Buttons(0x0008);
    pub const START: Buttons = Buttons(0x0010);
    pub const SELECT: Buttons = Buttons(0x0020);
    pub const UP: Buttons = Buttons(0x0040);
    pub const DOWN: Buttons = Buttons(0x0080);
    pub const LEFT: Buttons = Buttons(0x0100);
    pub const RIGHT: Buttons = Buttons(0x0200);

    /// All defined button bits.
    pub const ALL: Buttons = Buttons(0x03FF);

    /// No buttons pressed.
    pub fn empty() -> Self {
        Buttons(0)
    }

    /// Build a mask from raw bits; bits outside the pad are dropped.
    pub fn from_bits(bits: u16) -> Self {
        Buttons(bits & Self::ALL.0)
    }

    /// Raw bitmask value.
    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is pressed.
    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Buttons) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Buttons) {
        self.0 &= !other.0;
    }

    /// Set a button by name (for scripting/testing). Unknown names are
    /// ignored.
    pub fn set_button(&mut self, button: &str, pressed: bool) {
        let mask = match button.to_lowercase().as_str() {
            "a" => Buttons::A,
            "b" => Buttons::B,
            "x" => Buttons::X,
            "y" => Buttons::Y,
            "start" => Buttons::START,
            "select" => Buttons::SELECT,
            "up" => Buttons::UP,
            "down" => Buttons::DOWN,
            "left" => Buttons::LEFT,
            "right" => Buttons::RIGHT,
            _ => return,
        };
        if pressed {
            self.insert(mask);
        } else {
            self.remove(mask);
        }
    }
}

impl fmt::Display for Buttons {
    /// Positional mask in script order: `UDLRABXYTS` (T = Start,
    /// S = Select), `.` for released.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = [
            (Buttons::UP, 'U'),
            (Buttons::DOWN, 'D'),
            (Buttons::LEFT, 'L'),
            (Buttons::RIGHT, 'R'),
            (Buttons::A, 'A'),
            (Buttons::B, 'B'),
            (Buttons::X, 'X'),
            (Buttons::Y, 'Y'),
            (Buttons::START, 'T'),
            (Buttons::SELECT, 'S'),
        ];
        for (mask, ch) in order {
            write!(f, "{}", if self.contains(mask) { ch } else { '.' })?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Buttons {
    type Err = String;

    /// Parse a script token: any mix of the `Display` letters in any
    /// case and order, with `.` and `-` accepted as placeholders.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut buttons = Buttons::empty();
        for ch in token.chars() {
            let mask = match ch.to_ascii_uppercase() {
                'U' => Buttons::UP,
                'D' => Buttons::DOWN,
                'L' => Buttons::LEFT,
                'R' => Buttons::RIGHT,
                'A' => Buttons::A,
                'B' => Buttons::B,
                'X' => Buttons::X,
                'Y' => Buttons::Y,
                'T' => Buttons::START,
                'S' => Buttons::SELECT,
                '.' | '-' => continue,
                other => return Err(format!("unknown button letter '{}'", other)),
            };
            buttons.insert(mask);
        }
        Ok(buttons)
    }
}

/// Single-slot input latch shared between the host and the machine.
///
/// `set_state` is a total overwrite, not a merge: the host accumulates
/// pressed/released bits itself before writing. The latch is the only
/// cross-context input channel, so no lock is needed — one atomic word
/// carries the whole pad.
#[derive(Debug, Default)]
pub struct InputLatch {
    bits: AtomicU16,
}

impl InputLatch {
    pub fn new() -> Self {
        Self {
            bits: AtomicU16::new(0),
        }
    }

    /// Overwrite the latched button state.
    pub fn set_state(&self, buttons: Buttons) {
        // Relaxed is enough: the latch carries no ordering obligations,
        // only "visible no later than the next step after the write".
        self.bits.store(buttons.bits(), Ordering::Relaxed);
    }

    /// Read the latest latched state.
    pub fn state(&self) -> Buttons {
        Buttons::from_bits(self.bits.load(Ordering::Relaxed))
    }
}
