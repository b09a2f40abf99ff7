//! Instruction execution tests.
//!
//! Each test assembles a tiny program at the power-on program counter and
//! steps it, asserting registers, flags, memory, and cycle totals. The
//! first step of a fresh core includes the 2-cycle reset overhead.

use super::*;
use crate::cpu::test_utils::{create_cpu, TestRam};
use crate::memory::ROM_BASE;

// ============ Power-on, reset, halt ============

#[test]
fn test_power_on_state() {
    let cpu = Cpu::new();
    assert_eq!(cpu.pc, ROM_BASE);
    assert_eq!(cpu.a, 0);
    assert_eq!(cpu.x, 0);
    assert_eq!(cpu.y, 0);
    assert_eq!(cpu.sp, POWER_ON_SP);
    assert_eq!(cpu.p, POWER_ON_STATUS);
    assert_eq!(cpu.cycles, 0);
    assert!(!cpu.halted);
}

#[test]
fn test_reset_overhead_charged_once() {
    let (mut cpu, mut ram) = create_cpu(&[0xEA, 0xEA]);
    cpu.step(&mut ram);
    assert_eq!(cpu.cycles, 4); // 2 reset + 2 NOP
    cpu.step(&mut ram);
    assert_eq!(cpu.cycles, 6); // overhead not charged again
}

#[test]
fn test_canonical_boot_sequence() {
    // LDA #$42; NOP; BRK
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x42, 0xEA, 0x00]);

    assert_eq!(cpu.step(&mut ram), StepOutcome::Continued);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.cycles, 4);

    assert_eq!(cpu.step(&mut ram), StepOutcome::Continued);
    assert_eq!(cpu.cycles, 6);

    assert_eq!(cpu.step(&mut ram), StepOutcome::Halted);
    assert_eq!(cpu.cycles, 13);
    assert!(cpu.halted);

    // Further steps are inert until a reset
    let pc = cpu.pc;
    assert_eq!(cpu.step(&mut ram), StepOutcome::Halted);
    assert_eq!(cpu.cycles, 13);
    assert_eq!(cpu.pc, pc);
}

#[test]
fn test_reset_clears_halt_and_recharges_overhead() {
    let (mut cpu, mut ram) = create_cpu(&[0x00]);
    cpu.step(&mut ram);
    assert!(cpu.halted);

    cpu.reset();
    assert!(!cpu.halted);
    assert_eq!(cpu.pc, ROM_BASE);
    assert_eq!(cpu.cycles, 0);

    cpu.step(&mut ram);
    assert_eq!(cpu.cycles, 9); // 2 reset + 7 BRK
}

#[test]
fn test_soft_reset_preserves_data_registers() {
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x42, 0xA2, 0x07]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    cpu.reset();
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.x, 0x07);
    assert_eq!(cpu.pc, ROM_BASE);
}

// ============ Loads and stores ============

#[test]
fn test_lda_imm_sets_nz() {
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x00, 0xA9, 0x80, 0xA9, 0x42]);
    cpu.step(&mut ram);
    assert!(cpu.flag(flags::ZERO));
    assert!(!cpu.flag(flags::NEGATIVE));

    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::ZERO));
    assert!(cpu.flag(flags::NEGATIVE));

    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x42);
    assert!(!cpu.flag(flags::ZERO));
    assert!(!cpu.flag(flags::NEGATIVE));
}

#[test]
fn test_sta_lda_zero_page_roundtrip() {
    // LDA #$5A; STA $10; LDA #$00; LDA $10
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x5A, 0x85, 0x10, 0xA9, 0x00, 0xA5, 0x10]);
    for _ in 0..4 {
        cpu.step(&mut ram);
    }
    assert_eq!(ram.data[0x10], 0x5A);
    assert_eq!(cpu.a, 0x5A);
}

#[test]
fn test_sta_lda_absolute() {
    // LDA #$C3; STA $1234; LDA #$00; LDA $1234
    let (mut cpu, mut ram) = create_cpu(&[
        0xA9, 0xC3, 0x8D, 0x34, 0x12, 0xA9, 0x00, 0xAD, 0x34, 0x12,
    ]);
    for _ in 0..4 {
        cpu.step(&mut ram);
    }
    assert_eq!(ram.data[0x1234], 0xC3);
    assert_eq!(cpu.a, 0xC3);
    assert!(cpu.flag(flags::NEGATIVE));
}

#[test]
fn test_ldx_ldy_and_stores() {
    // LDX #$11; LDY #$22; STX $40; STY $41
    let (mut cpu, mut ram) = create_cpu(&[0xA2, 0x11, 0xA0, 0x22, 0x86, 0x40, 0x84, 0x41]);
    for _ in 0..4 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.x, 0x11);
    assert_eq!(cpu.y, 0x22);
    assert_eq!(ram.data[0x40], 0x11);
    assert_eq!(ram.data[0x41], 0x22);
}

#[test]
fn test_zero_page_load_cycle_cost() {
    let (mut cpu, mut ram) = create_cpu(&[0xA5, 0x10]);
    cpu.step(&mut ram);
    assert_eq!(cpu.cycles, 5); // 2 reset + 3 zero-page load
}

// ============ Register transfers ============

#[test]
fn test_transfers_set_flags() {
    // LDA #$80; TAX; TAY; LDA #$00; TXA
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x80, 0xAA, 0xA8, 0xA9, 0x00, 0x8A]);
    for _ in 0..3 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.x, 0x80);
    assert_eq!(cpu.y, 0x80);
    assert!(cpu.flag(flags::NEGATIVE));

    cpu.step(&mut ram);
    assert!(cpu.flag(flags::ZERO));
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x80);
    assert!(cpu.flag(flags::NEGATIVE));
}

#[test]
fn test_txs_sets_no_flags_tsx_does() {
    // LDX #$00; TXS; TSX
    let (mut cpu, mut ram) = create_cpu(&[0xA2, 0x00, 0x9A, 0xBA]);
    cpu.step(&mut ram);
    let p_after_ldx = cpu.p;

    cpu.step(&mut ram);
    assert_eq!(cpu.sp, 0x0100);
    assert_eq!(cpu.p, p_after_ldx); // TXS leaves flags alone

    cpu.step(&mut ram);
    assert_eq!(cpu.x, 0x00);
    assert!(cpu.flag(flags::ZERO));
}

// ============ Stack ============

#[test]
fn test_pha_pla_roundtrip() {
    // LDA #$7F; PHA; LDA #$00; PLA
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x7F, 0x48, 0xA9, 0x00, 0x68]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.sp, POWER_ON_SP - 1);
    assert_eq!(ram.data[POWER_ON_SP as usize], 0x7F);

    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x7F);
    assert_eq!(cpu.sp, POWER_ON_SP);
    assert!(!cpu.flag(flags::ZERO));
}

#[test]
fn test_php_plp_break_bit_convention() {
    // SEC; PHP; CLC; PLP
    let (mut cpu, mut ram) = create_cpu(&[0x38, 0x08, 0x18, 0x28]);
    for _ in 0..2 {
        cpu.step(&mut ram);
    }
    // Pushed copy carries B and the unused bit
    assert_eq!(
        ram.data[POWER_ON_SP as usize],
        POWER_ON_STATUS | flags::CARRY | flags::BREAK | flags::UNUSED
    );

    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::CARRY));

    cpu.step(&mut ram);
    assert!(cpu.flag(flags::CARRY)); // restored
    assert!(!cpu.flag(flags::BREAK)); // B never lands in the live register
    assert!(cpu.flag(flags::UNUSED));
}

// ============ Arithmetic ============

#[test]
fn test_adc_basic() {
    // LDA #$10; ADC #$05 (power-on carry is clear)
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x10, 0x69, 0x05]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x15);
    assert!(!cpu.flag(flags::CARRY));
    assert!(!cpu.flag(flags::OVERFLOW));
}

#[test]
fn test_adc_carry_in_and_out() {
    // SEC; LDA #$FF; ADC #$00 -> 0x00 with carry out
    let (mut cpu, mut ram) = create_cpu(&[0x38, 0xA9, 0xFF, 0x69, 0x00]);
    for _ in 0..3 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flag(flags::CARRY));
    assert!(cpu.flag(flags::ZERO));
    assert!(!cpu.flag(flags::OVERFLOW));
}

#[test]
fn test_adc_signed_overflow() {
    // LDA #$50; ADC #$50 -> 0xA0, two positives summing negative
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x50, 0x69, 0x50]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0xA0);
    assert!(cpu.flag(flags::OVERFLOW));
    assert!(cpu.flag(flags::NEGATIVE));
    assert!(!cpu.flag(flags::CARRY));
}

#[test]
fn test_sbc_no_borrow() {
    // SEC; LDA #$50; SBC #$10
    let (mut cpu, mut ram) = create_cpu(&[0x38, 0xA9, 0x50, 0xE9, 0x10]);
    for _ in 0..3 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.a, 0x40);
    assert!(cpu.flag(flags::CARRY));
}

#[test]
fn test_sbc_with_borrow_wraps() {
    // CLC (borrow pending); LDA #$00; SBC #$00 -> 0xFF
    let (mut cpu, mut ram) = create_cpu(&[0x18, 0xA9, 0x00, 0xE9, 0x00]);
    for _ in 0..3 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.a, 0xFF);
    assert!(!cpu.flag(flags::CARRY));
    assert!(cpu.flag(flags::NEGATIVE));
}

// ============ Logic and compares ============

#[test]
fn test_and_ora_eor() {
    // LDA #$F0; AND #$3C; ORA #$01; EOR #$FF
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0xF0, 0x29, 0x3C, 0x09, 0x01, 0x49, 0xFF]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x30);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x31);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0xCE);
    assert!(cpu.flag(flags::NEGATIVE));
}

#[test]
fn test_cmp_orderings() {
    // Equal: Z and C. Less: neither, N from the difference. Greater: C only.
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x40, 0xC9, 0x40, 0xC9, 0x41, 0xC9, 0x3F]);
    cpu.step(&mut ram);

    cpu.step(&mut ram);
    assert!(cpu.flag(flags::ZERO));
    assert!(cpu.flag(flags::CARRY));

    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::ZERO));
    assert!(!cpu.flag(flags::CARRY));
    assert!(cpu.flag(flags::NEGATIVE));

    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::ZERO));
    assert!(cpu.flag(flags::CARRY));
}

#[test]
fn test_cpx_cpy() {
    // LDX #$10; CPX #$10; LDY #$05; CPY #$06
    let (mut cpu, mut ram) = create_cpu(&[0xA2, 0x10, 0xE0, 0x10, 0xA0, 0x05, 0xC0, 0x06]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert!(cpu.flag(flags::ZERO));
    assert!(cpu.flag(flags::CARRY));

    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::CARRY));
}

#[test]
fn test_bit_copies_operand_high_bits() {
    // LDA #$0F; BIT $10 where $10 holds 0xC0
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x0F, 0x24, 0x10]);
    ram.data[0x10] = 0xC0;
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert!(cpu.flag(flags::ZERO)); // 0x0F & 0xC0 == 0
    assert!(cpu.flag(flags::NEGATIVE));
    assert!(cpu.flag(flags::OVERFLOW));
    assert_eq!(cpu.a, 0x0F); // accumulator untouched
}

// ============ Increments and decrements ============

#[test]
fn test_inx_dex_wraparound() {
    // LDX #$FF; INX; DEX
    let (mut cpu, mut ram) = create_cpu(&[0xA2, 0xFF, 0xE8, 0xCA]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.x, 0x00);
    assert!(cpu.flag(flags::ZERO));

    cpu.step(&mut ram);
    assert_eq!(cpu.x, 0xFF);
    assert!(cpu.flag(flags::NEGATIVE));
}

#[test]
fn test_iny_dey() {
    let (mut cpu, mut ram) = create_cpu(&[0xC8, 0x88, 0x88]);
    cpu.step(&mut ram);
    assert_eq!(cpu.y, 1);
    cpu.step(&mut ram);
    assert_eq!(cpu.y, 0);
    assert!(cpu.flag(flags::ZERO));
    cpu.step(&mut ram);
    assert_eq!(cpu.y, 0xFF);
}

#[test]
fn test_inc_dec_memory() {
    // INC $10; DEC $2000 (absolute)
    let (mut cpu, mut ram) = create_cpu(&[0xE6, 0x10, 0xCE, 0x00, 0x20]);
    ram.data[0x10] = 0x7F;
    ram.data[0x2000] = 0x01;

    cpu.step(&mut ram);
    assert_eq!(ram.data[0x10], 0x80);
    assert!(cpu.flag(flags::NEGATIVE));

    cpu.step(&mut ram);
    assert_eq!(ram.data[0x2000], 0x00);
    assert!(cpu.flag(flags::ZERO));
    assert_eq!(cpu.cycles, 2 + 5 + 6);
}

// ============ Shifts and rotates ============

#[test]
fn test_asl_shifts_carry_out() {
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x81, 0x0A]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x02);
    assert!(cpu.flag(flags::CARRY));
    assert!(!cpu.flag(flags::NEGATIVE));
}

#[test]
fn test_lsr_to_zero() {
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x01, 0x4A]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flag(flags::CARRY));
    assert!(cpu.flag(flags::ZERO));
}

#[test]
fn test_rol_ror_through_carry() {
    // SEC; LDA #$80; ROL -> 0x01 carry out; SEC; ROR -> 0x80 carry out
    let (mut cpu, mut ram) = create_cpu(&[0x38, 0xA9, 0x80, 0x2A, 0x38, 0x6A]);
    for _ in 0..3 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.a, 0x01);
    assert!(cpu.flag(flags::CARRY));

    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.a, 0x80);
    assert!(cpu.flag(flags::CARRY));
    assert!(cpu.flag(flags::NEGATIVE));
}

// ============ Control flow ============

#[test]
fn test_jmp_absolute() {
    let (mut cpu, mut ram) = create_cpu(&[0x4C, 0x00, 0x90]);
    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x9000);
    assert_eq!(cpu.cycles, 2 + 3);
}

#[test]
fn test_jsr_rts_roundtrip() {
    // 8000: JSR $8010 / 8003: NOP ... 8010: RTS
    let (mut cpu, mut ram) = create_cpu(&[0x20, 0x10, 0x80, 0xEA]);
    ram.load(0x8010, &[0x60]);

    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x8010);
    assert_eq!(cpu.sp, POWER_ON_SP - 2);
    assert_eq!(ram.data[0x01FF], 0x80); // return address hi
    assert_eq!(ram.data[0x01FE], 0x02); // return address lo (last byte of JSR)

    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x8003);
    assert_eq!(cpu.sp, POWER_ON_SP);
    assert_eq!(cpu.cycles, 2 + 6 + 6);
}

#[test]
fn test_branch_taken_costs_extra_cycle() {
    // Power-on status has Z clear, so BNE is taken and BEQ is not
    let (mut cpu, mut ram) = create_cpu(&[0xD0, 0x02]);
    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x8004);
    assert_eq!(cpu.cycles, 2 + 3);

    let (mut cpu, mut ram) = create_cpu(&[0xF0, 0x02]);
    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x8002);
    assert_eq!(cpu.cycles, 2 + 2);
}

#[test]
fn test_branch_backward() {
    // NOP; NOP; BNE -4 lands back on the first NOP
    let (mut cpu, mut ram) = create_cpu(&[0xEA, 0xEA, 0xD0, 0xFC]);
    for _ in 0..3 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.pc, 0x8000);
}

#[test]
fn test_all_branch_conditions() {
    // BMI taken after LDA #$80, BPL taken after LDA #$01
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x80, 0x30, 0x00, 0xA9, 0x01, 0x10, 0x00]);
    cpu.step(&mut ram);
    let before = cpu.cycles;
    cpu.step(&mut ram);
    assert_eq!(cpu.cycles - before, 3); // taken, offset zero

    cpu.step(&mut ram);
    let before = cpu.cycles;
    cpu.step(&mut ram);
    assert_eq!(cpu.cycles - before, 3);

    // BCS after SEC, BCC after CLC
    let (mut cpu, mut ram) = create_cpu(&[0x38, 0xB0, 0x00, 0x18, 0x90, 0x00]);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x8003);
    cpu.step(&mut ram);
    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x8006);

    // BVS after signed overflow, then CLV and BVC
    let (mut cpu, mut ram) = create_cpu(&[0xA9, 0x50, 0x69, 0x50, 0x70, 0x00, 0xB8, 0x50, 0x00]);
    for _ in 0..3 {
        cpu.step(&mut ram);
    }
    assert_eq!(cpu.pc, 0x8006);
    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::OVERFLOW));
    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x8009);
}

// ============ Flag operations ============

#[test]
fn test_flag_set_clear_pairs() {
    let (mut cpu, mut ram) = create_cpu(&[0x38, 0x18, 0x78, 0x58, 0xF8, 0xD8]);
    cpu.step(&mut ram);
    assert!(cpu.flag(flags::CARRY));
    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::CARRY));

    cpu.step(&mut ram);
    assert!(cpu.flag(flags::IRQ_DISABLE));
    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::IRQ_DISABLE));

    cpu.step(&mut ram);
    assert!(cpu.flag(flags::DECIMAL));
    cpu.step(&mut ram);
    assert!(!cpu.flag(flags::DECIMAL));
}

// ============ Permissiveness ============

#[test]
fn test_unmapped_opcode_executes_as_nop() {
    let (mut cpu, mut ram) = create_cpu(&[0x02, 0xEA]);
    assert_eq!(cpu.step(&mut ram), StepOutcome::Continued);
    assert_eq!(cpu.pc, 0x8001);
    assert_eq!(cpu.cycles, 4); // 2 reset + 2
    assert_eq!(cpu.a, 0);
    assert!(!cpu.halted);
}

#[test]
fn test_pc_wraps_at_address_top() {
    let (mut cpu, mut ram) = create_cpu(&[]);
    ram.data[0xFFFF] = 0xEA;
    cpu.pc = 0xFFFF;
    cpu.step(&mut ram);
    assert_eq!(cpu.pc, 0x0000);
}
