#![no_main]

//! Whole-machine fuzzer: arbitrary ROMs run for a few frames with a
//! snapshot/restore cycle in the middle. Restoring a snapshot of the
//! current state must be accepted and must change nothing.

use argent::machine::Machine;
use argent::ppu::FRAMEBUFFER_SIZE;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let frames = u64::from(data[0] % 4) + 1;

    let mut machine = Machine::new();
    machine.load_rom(&data[1..]);

    for expected in 1..=frames {
        let frame = machine.run_frame().expect("ROM is loaded");
        assert_eq!(frame.len(), FRAMEBUFFER_SIZE);
        assert_eq!(machine.frame_count(), expected);
    }

    let snapshot = machine.snapshot();
    let cpu_before = machine.cpu.clone();
    machine.restore(&snapshot).expect("own snapshot fits");
    assert_eq!(machine.cpu, cpu_before);
    assert_eq!(machine.frame_count(), frames);

    // Replay after restore stays deterministic
    let first = machine.run_frame().expect("ROM is loaded").to_vec();
    machine.restore(&snapshot).expect("own snapshot fits");
    let second = machine.run_frame().expect("ROM is loaded").to_vec();
    assert_eq!(first, second);
});
