#![no_main]

//! Feeds arbitrary bytes to the CPU as a ROM image and steps it,
//! asserting the invariants that hold for every program:
//!
//! 1. Every step costs at least 2 cycles (the frame loop relies on it)
//! 2. No step costs more than the dearest instruction plus reset overhead
//! 3. A halted CPU is inert: no cycle or register movement
//! 4. Unknown opcodes never panic

use argent::cpu::StepOutcome;
use argent::machine::Machine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut machine = Machine::new();
    machine.load_rom(data);

    for _ in 0..2000 {
        let before = machine.cpu.cycles;
        let outcome = machine.cpu.step(&mut machine.bus);

        if outcome == StepOutcome::Halted {
            assert!(machine.cpu.halted);
            // Once halted, nothing moves until a reset
            let frozen = machine.cpu.clone();
            machine.cpu.step(&mut machine.bus);
            assert_eq!(machine.cpu, frozen);
            break;
        }

        let cost = machine.cpu.cycles - before;
        assert!(
            (2..=10).contains(&cost),
            "step cost {} at pc {:#06X}",
            cost,
            machine.cpu.pc
        );
    }

    // Frames always come out well-formed, whatever the program did
    let frame = machine.run_frame().expect("ROM is loaded");
    assert_eq!(frame.len(), argent::ppu::FRAMEBUFFER_SIZE);
});
