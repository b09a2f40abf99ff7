#![no_main]

//! Drives the bus with arbitrary read/write sequences and checks the
//! routing rules directly against the memory map:
//!
//! - RAM reads return the last RAM write to that address
//! - the ROM window and unmapped space never change from writes
//! - the latch registers always mirror the latch, high bits zero

use std::sync::Arc;

use argent::io::{Buttons, InputLatch};
use argent::memory::{Bus, JOYPAD_HI, JOYPAD_LO, RAM_END, ROM_BASE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let latch = Arc::new(InputLatch::new());
    let mut bus = Bus::new(Arc::clone(&latch));

    // First chunk becomes the ROM image
    let split = data.len() / 2;
    bus.load_rom(&data[..split]);
    let rom_image = &data[..split];

    for chunk in data[split..].chunks_exact(4) {
        let address = u16::from_le_bytes([chunk[0], chunk[1]]);
        let value = chunk[2];

        match chunk[3] % 3 {
            0 => {
                bus.write_byte(address, value);
                if address < RAM_END {
                    assert_eq!(bus.read_byte(address), value);
                }
            }
            1 => {
                let read = bus.read_byte(address);
                if address >= ROM_BASE {
                    let offset = (address - ROM_BASE) as usize;
                    let expected = rom_image.get(offset).copied().unwrap_or(0);
                    assert_eq!(read, expected, "ROM window at {:#06X}", address);
                } else if address >= RAM_END && address != JOYPAD_LO && address != JOYPAD_HI {
                    assert_eq!(read, 0, "open bus at {:#06X}", address);
                }
            }
            _ => {
                let buttons = Buttons::from_bits(u16::from_le_bytes([value, chunk[3]]));
                latch.set_state(buttons);
                let lo = bus.read_byte(JOYPAD_LO);
                let hi = bus.read_byte(JOYPAD_HI);
                assert_eq!(u16::from(lo) | (u16::from(hi) << 8), buttons.bits());
                assert_eq!(hi & 0xFC, 0, "only 10 pad bits exist");
            }
        }
    }
});
