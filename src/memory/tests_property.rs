use super::{Bus, RAM_END, RAM_SIZE, ROM_BASE};
use crate::io::InputLatch;
use proptest::prelude::*;
use std::sync::Arc;

fn test_bus() -> Bus {
    Bus::new(Arc::new(InputLatch::new()))
}

proptest! {
    // RAM write/read roundtrip for every value
    #[test]
    fn prop_ram_roundtrip(addr in 0..RAM_END, val in any::<u8>()) {
        let mut bus = test_bus();
        bus.write_byte(addr, val);
        prop_assert_eq!(bus.read_byte(addr), val);
    }

    // The cell addressed by `a` is the cell addressed by `a + RAM_SIZE*k`
    // truncated to the bus width: RAM_SIZE is a multiple of 2^16, so the
    // offset vanishes on the wire and the modulo indexing lines up with it.
    #[test]
    fn prop_ram_wraparound(addr in 0..RAM_END, val in any::<u8>(), k in 0u32..8) {
        let mut bus = test_bus();
        let aliased = addr.wrapping_add((RAM_SIZE as u32 * k) as u16);

        bus.write_byte(addr, val);
        prop_assert_eq!(bus.read_byte(aliased), val);

        // And the backing index agrees with the routed read
        prop_assert_eq!(bus.ram[addr as usize % RAM_SIZE], val);
    }

    // Every in-window address past the loaded image reads zero
    #[test]
    fn prop_rom_bounds_zero(rom_len in 0usize..1024, offset in 0u16..0x8000) {
        let mut bus = test_bus();
        bus.load_rom(&vec![0xFF; rom_len]);

        if (offset as usize) >= rom_len {
            prop_assert_eq!(bus.read_byte(ROM_BASE + offset), 0);
        } else {
            prop_assert_eq!(bus.read_byte(ROM_BASE + offset), 0xFF);
        }
    }

    // Writes outside the RAM window are never observable anywhere
    #[test]
    fn prop_non_ram_writes_discarded(addr in RAM_END..=u16::MAX, val in any::<u8>()) {
        let mut bus = test_bus();
        bus.load_rom(&[0x5A; 16]);

        let before = bus.read_byte(addr);
        bus.write_byte(addr, val);
        prop_assert_eq!(bus.read_byte(addr), before);

        // RAM is untouched as well
        prop_assert!(bus.ram.iter().all(|&b| b == 0));
    }
}
