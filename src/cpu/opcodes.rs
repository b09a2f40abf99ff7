//! Opcode dispatch table.
//!
//! Every possible opcode byte maps to a descriptor carrying its mnemonic,
//! operand width, cycle cost, and handler. Unmapped encodings are 2-cycle
//! no-ops — the dispatch loop never fails on an unknown byte, mirroring
//! hardware that has no invalid-opcode trap. The mapped subset uses the
//! authentic 65xx encodings and costs.
//!
//! Addressing modes covered: implied, accumulator, immediate, zero page,
//! absolute, and relative (branches). Taken branches cost one extra cycle;
//! the page-cross penalty is not modeled.

use super::{flags, Cpu};
use crate::memory::MemoryInterface;

/// One entry of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// Assembler mnemonic (`"???"` for unmapped encodings).
    pub mnemonic: &'static str,
    /// Operand bytes following the opcode (0-2).
    pub operand_bytes: u8,
    /// Base cycle cost. Taken branches add one more at execution time.
    pub cycles: u32,
    /// Register/flag/memory mutation.
    pub exec: fn(&mut Cpu, &mut dyn MemoryInterface),
}

const fn op(
    mnemonic: &'static str,
    operand_bytes: u8,
    cycles: u32,
    exec: fn(&mut Cpu, &mut dyn MemoryInterface),
) -> Opcode {
    Opcode {
        mnemonic,
        operand_bytes,
        cycles,
        exec,
    }
}

const fn ill() -> Opcode {
    op("???", 0, 2, exec_ill)
}

#[rustfmt::skip]
pub static OPCODES: [Opcode; 256] = [
    // 0x00
    op("BRK", 0, 7, exec_brk), ill(), ill(), ill(),
    ill(), op("ORA", 1, 3, exec_ora_zp), ill(), ill(),
    op("PHP", 0, 3, exec_php), op("ORA", 1, 2, exec_ora_imm), op("ASL", 0, 2, exec_asl_a), ill(),
    ill(), op("ORA", 2, 4, exec_ora_abs), ill(), ill(),
    // 0x10
    op("BPL", 1, 2, exec_bpl), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("CLC", 0, 2, exec_clc), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    // 0x20
    op("JSR", 2, 6, exec_jsr), ill(), ill(), ill(),
    op("BIT", 1, 3, exec_bit_zp), op("AND", 1, 3, exec_and_zp), ill(), ill(),
    op("PLP", 0, 4, exec_plp), op("AND", 1, 2, exec_and_imm), op("ROL", 0, 2, exec_rol_a), ill(),
    ill(), op("AND", 2, 4, exec_and_abs), ill(), ill(),
    // 0x30
    op("BMI", 1, 2, exec_bmi), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("SEC", 0, 2, exec_sec), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    // 0x40
    ill(), ill(), ill(), ill(),
    ill(), op("EOR", 1, 3, exec_eor_zp), ill(), ill(),
    op("PHA", 0, 3, exec_pha), op("EOR", 1, 2, exec_eor_imm), op("LSR", 0, 2, exec_lsr_a), ill(),
    op("JMP", 2, 3, exec_jmp_abs), op("EOR", 2, 4, exec_eor_abs), ill(), ill(),
    // 0x50
    op("BVC", 1, 2, exec_bvc), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("CLI", 0, 2, exec_cli), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    // 0x60
    op("RTS", 0, 6, exec_rts), ill(), ill(), ill(),
    ill(), op("ADC", 1, 3, exec_adc_zp), ill(), ill(),
    op("PLA", 0, 4, exec_pla), op("ADC", 1, 2, exec_adc_imm), op("ROR", 0, 2, exec_ror_a), ill(),
    ill(), op("ADC", 2, 4, exec_adc_abs), ill(), ill(),
    // 0x70
    op("BVS", 1, 2, exec_bvs), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("SEI", 0, 2, exec_sei), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    // 0x80
    ill(), ill(), ill(), ill(),
    op("STY", 1, 3, exec_sty_zp), op("STA", 1, 3, exec_sta_zp), op("STX", 1, 3, exec_stx_zp), ill(),
    op("DEY", 0, 2, exec_dey), ill(), op("TXA", 0, 2, exec_txa), ill(),
    op("STY", 2, 4, exec_sty_abs), op("STA", 2, 4, exec_sta_abs), op("STX", 2, 4, exec_stx_abs), ill(),
    // 0x90
    op("BCC", 1, 2, exec_bcc), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("TYA", 0, 2, exec_tya), ill(), op("TXS", 0, 2, exec_txs), ill(),
    ill(), ill(), ill(), ill(),
    // 0xA0
    op("LDY", 1, 2, exec_ldy_imm), ill(), op("LDX", 1, 2, exec_ldx_imm), ill(),
    op("LDY", 1, 3, exec_ldy_zp), op("LDA", 1, 3, exec_lda_zp), op("LDX", 1, 3, exec_ldx_zp), ill(),
    op("TAY", 0, 2, exec_tay), op("LDA", 1, 2, exec_lda_imm), op("TAX", 0, 2, exec_tax), ill(),
    op("LDY", 2, 4, exec_ldy_abs), op("LDA", 2, 4, exec_lda_abs), op("LDX", 2, 4, exec_ldx_abs), ill(),
    // 0xB0
    op("BCS", 1, 2, exec_bcs), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("CLV", 0, 2, exec_clv), ill(), op("TSX", 0, 2, exec_tsx), ill(),
    ill(), ill(), ill(), ill(),
    // 0xC0
    op("CPY", 1, 2, exec_cpy_imm), ill(), ill(), ill(),
    ill(), op("CMP", 1, 3, exec_cmp_zp), op("DEC", 1, 5, exec_dec_zp), ill(),
    op("INY", 0, 2, exec_iny), op("CMP", 1, 2, exec_cmp_imm), op("DEX", 0, 2, exec_dex), ill(),
    ill(), op("CMP", 2, 4, exec_cmp_abs), op("DEC", 2, 6, exec_dec_abs), ill(),
    // 0xD0
    op("BNE", 1, 2, exec_bne), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("CLD", 0, 2, exec_cld), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    // 0xE0
    op("CPX", 1, 2, exec_cpx_imm), ill(), ill(), ill(),
    ill(), op("SBC", 1, 3, exec_sbc_zp), op("INC", 1, 5, exec_inc_zp), ill(),
    op("INX", 0, 2, exec_inx), op("SBC", 1, 2, exec_sbc_imm), op("NOP", 0, 2, exec_nop), ill(),
    ill(), op("SBC", 2, 4, exec_sbc_abs), op("INC", 2, 6, exec_inc_abs), ill(),
    // 0xF0
    op("BEQ", 1, 2, exec_beq), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
    op("SED", 0, 2, exec_sed), ill(), ill(), ill(),
    ill(), ill(), ill(), ill(),
];

/// Format the instruction at `addr` for trace output. Operands are shown
/// as raw hex; the table does not distinguish immediate from memory modes
/// in its rendering.
pub fn disassemble(bus: &mut dyn MemoryInterface, addr: u16) -> String {
    let desc = &OPCODES[bus.read_byte(addr) as usize];
    match desc.operand_bytes {
        0 => desc.mnemonic.to_string(),
        1 => format!("{} ${:02X}", desc.mnemonic, bus.read_byte(addr.wrapping_add(1))),
        _ => {
            let lo = bus.read_byte(addr.wrapping_add(1));
            let hi = bus.read_byte(addr.wrapping_add(2));
            format!("{} ${:04X}", desc.mnemonic, u16::from(lo) | (u16::from(hi) << 8))
        }
    }
}

// ---------------------------------------------------------------------------
// Addressing helpers
// ---------------------------------------------------------------------------

fn zp_addr(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) -> u16 {
    u16::from(cpu.fetch_byte(bus))
}

fn abs_addr(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) -> u16 {
    cpu.fetch_word(bus)
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// BRK latches the halt condition; the caller ends the step batch.
fn exec_brk(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.halted = true;
}

fn exec_nop(_cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {}

/// Unmapped encodings degrade to a no-op (permissiveness policy).
fn exec_ill(_cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {}

// ---------------------------------------------------------------------------
// Loads and stores
// ---------------------------------------------------------------------------

fn load_a(cpu: &mut Cpu, value: u8) {
    cpu.a = value;
    cpu.set_nz(value);
}

fn load_x(cpu: &mut Cpu, value: u8) {
    cpu.x = value;
    cpu.set_nz(value);
}

fn load_y(cpu: &mut Cpu, value: u8) {
    cpu.y = value;
    cpu.set_nz(value);
}

fn exec_lda_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    load_a(cpu, value);
}

fn exec_lda_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, value);
}

fn exec_lda_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, value);
}

fn exec_ldx_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    load_x(cpu, value);
}

fn exec_ldx_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_x(cpu, value);
}

fn exec_ldx_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_x(cpu, value);
}

fn exec_ldy_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    load_y(cpu, value);
}

fn exec_ldy_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_y(cpu, value);
}

fn exec_ldy_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_y(cpu, value);
}

fn exec_sta_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    bus.write_byte(addr, cpu.a);
}

fn exec_sta_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    bus.write_byte(addr, cpu.a);
}

fn exec_stx_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    bus.write_byte(addr, cpu.x);
}

fn exec_stx_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    bus.write_byte(addr, cpu.x);
}

fn exec_sty_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    bus.write_byte(addr, cpu.y);
}

fn exec_sty_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    bus.write_byte(addr, cpu.y);
}

// ---------------------------------------------------------------------------
// Register transfers
// ---------------------------------------------------------------------------

fn exec_tax(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_x(cpu, cpu.a);
}

fn exec_txa(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_a(cpu, cpu.x);
}

fn exec_tay(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_y(cpu, cpu.a);
}

fn exec_tya(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_a(cpu, cpu.y);
}

/// TXS targets the stack page; it is the one transfer that sets no flags.
fn exec_txs(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.sp = 0x0100 | u16::from(cpu.x);
}

fn exec_tsx(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    let value = (cpu.sp & 0xFF) as u8;
    load_x(cpu, value);
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

fn exec_pha(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.a;
    cpu.push(bus, value);
}

fn exec_pla(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.pop(bus);
    load_a(cpu, value);
}

fn exec_php(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    // The pushed copy always has B and the unused bit set
    let value = cpu.p | flags::BREAK | flags::UNUSED;
    cpu.push(bus, value);
}

fn exec_plp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.pop(bus);
    cpu.p = (value | flags::UNUSED) & !flags::BREAK;
}

// ---------------------------------------------------------------------------
// Arithmetic and logic
// ---------------------------------------------------------------------------

/// Binary add with carry. Decimal mode is not modeled.
fn adc(cpu: &mut Cpu, operand: u8) {
    let carry = u16::from(cpu.flag(flags::CARRY));
    let sum = u16::from(cpu.a) + u16::from(operand) + carry;
    let result = sum as u8;

    cpu.set_flag(flags::CARRY, sum > 0xFF);
    // Overflow: both inputs share a sign the result does not
    cpu.set_flag(
        flags::OVERFLOW,
        (cpu.a ^ result) & (operand ^ result) & 0x80 != 0,
    );
    cpu.a = result;
    cpu.set_nz(result);
}

/// SBC is ADC of the one's complement.
fn sbc(cpu: &mut Cpu, operand: u8) {
    adc(cpu, !operand);
}

fn compare(cpu: &mut Cpu, register: u8, operand: u8) {
    let result = register.wrapping_sub(operand);
    cpu.set_flag(flags::CARRY, register >= operand);
    cpu.set_nz(result);
}

fn exec_adc_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    adc(cpu, value);
}

fn exec_adc_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    adc(cpu, value);
}

fn exec_adc_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    adc(cpu, value);
}

fn exec_sbc_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    sbc(cpu, value);
}

fn exec_sbc_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    sbc(cpu, value);
}

fn exec_sbc_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    sbc(cpu, value);
}

fn exec_and_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    load_a(cpu, cpu.a & value);
}

fn exec_and_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, cpu.a & value);
}

fn exec_and_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, cpu.a & value);
}

fn exec_ora_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    load_a(cpu, cpu.a | value);
}

fn exec_ora_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, cpu.a | value);
}

fn exec_ora_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, cpu.a | value);
}

fn exec_eor_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    load_a(cpu, cpu.a ^ value);
}

fn exec_eor_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, cpu.a ^ value);
}

fn exec_eor_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    load_a(cpu, cpu.a ^ value);
}

fn exec_cmp_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    compare(cpu, cpu.a, value);
}

fn exec_cmp_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    compare(cpu, cpu.a, value);
}

fn exec_cmp_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    let value = bus.read_byte(addr);
    compare(cpu, cpu.a, value);
}

fn exec_cpx_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    compare(cpu, cpu.x, value);
}

fn exec_cpy_imm(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let value = cpu.fetch_byte(bus);
    compare(cpu, cpu.y, value);
}

/// BIT: Z from the masked accumulator, N and V copied from the operand.
fn exec_bit_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    let value = bus.read_byte(addr);
    cpu.set_flag(flags::ZERO, cpu.a & value == 0);
    cpu.set_flag(flags::NEGATIVE, value & 0x80 != 0);
    cpu.set_flag(flags::OVERFLOW, value & 0x40 != 0);
}

// ---------------------------------------------------------------------------
// Increments and decrements
// ---------------------------------------------------------------------------

fn exec_inx(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_x(cpu, cpu.x.wrapping_add(1));
}

fn exec_iny(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_y(cpu, cpu.y.wrapping_add(1));
}

fn exec_dex(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_x(cpu, cpu.x.wrapping_sub(1));
}

fn exec_dey(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    load_y(cpu, cpu.y.wrapping_sub(1));
}

fn inc_memory(cpu: &mut Cpu, bus: &mut dyn MemoryInterface, addr: u16, delta: u8) {
    let value = bus.read_byte(addr).wrapping_add(delta);
    bus.write_byte(addr, value);
    cpu.set_nz(value);
}

fn exec_inc_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    inc_memory(cpu, bus, addr, 1);
}

fn exec_inc_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    inc_memory(cpu, bus, addr, 1);
}

fn exec_dec_zp(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = zp_addr(cpu, bus);
    inc_memory(cpu, bus, addr, 0xFF);
}

fn exec_dec_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let addr = abs_addr(cpu, bus);
    inc_memory(cpu, bus, addr, 0xFF);
}

// ---------------------------------------------------------------------------
// Shifts and rotates (accumulator)
// ---------------------------------------------------------------------------

fn exec_asl_a(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::CARRY, cpu.a & 0x80 != 0);
    load_a(cpu, cpu.a << 1);
}

fn exec_lsr_a(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::CARRY, cpu.a & 0x01 != 0);
    load_a(cpu, cpu.a >> 1);
}

fn exec_rol_a(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    let carry_in = u8::from(cpu.flag(flags::CARRY));
    cpu.set_flag(flags::CARRY, cpu.a & 0x80 != 0);
    load_a(cpu, (cpu.a << 1) | carry_in);
}

fn exec_ror_a(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    let carry_in = u8::from(cpu.flag(flags::CARRY)) << 7;
    cpu.set_flag(flags::CARRY, cpu.a & 0x01 != 0);
    load_a(cpu, (cpu.a >> 1) | carry_in);
}

// ---------------------------------------------------------------------------
// Jumps and subroutines
// ---------------------------------------------------------------------------

fn exec_jmp_abs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    cpu.pc = abs_addr(cpu, bus);
}

/// JSR pushes the address of its own last byte; RTS adds one back.
fn exec_jsr(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let target = cpu.fetch_word(bus);
    let ret = cpu.pc.wrapping_sub(1);
    cpu.push(bus, (ret >> 8) as u8);
    cpu.push(bus, (ret & 0xFF) as u8);
    cpu.pc = target;
}

fn exec_rts(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let lo = cpu.pop(bus);
    let hi = cpu.pop(bus);
    cpu.pc = (u16::from(lo) | (u16::from(hi) << 8)).wrapping_add(1);
}

// ---------------------------------------------------------------------------
// Branches (relative, +1 cycle when taken)
// ---------------------------------------------------------------------------

fn branch(cpu: &mut Cpu, bus: &mut dyn MemoryInterface, condition: bool) {
    let offset = cpu.fetch_byte(bus) as i8;
    if condition {
        cpu.cycles += 1;
        cpu.pc = cpu.pc.wrapping_add(offset as u16);
    }
}

fn exec_bpl(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = !cpu.flag(flags::NEGATIVE);
    branch(cpu, bus, cond);
}

fn exec_bmi(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = cpu.flag(flags::NEGATIVE);
    branch(cpu, bus, cond);
}

fn exec_bvc(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = !cpu.flag(flags::OVERFLOW);
    branch(cpu, bus, cond);
}

fn exec_bvs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = cpu.flag(flags::OVERFLOW);
    branch(cpu, bus, cond);
}

fn exec_bcc(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = !cpu.flag(flags::CARRY);
    branch(cpu, bus, cond);
}

fn exec_bcs(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = cpu.flag(flags::CARRY);
    branch(cpu, bus, cond);
}

fn exec_bne(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = !cpu.flag(flags::ZERO);
    branch(cpu, bus, cond);
}

fn exec_beq(cpu: &mut Cpu, bus: &mut dyn MemoryInterface) {
    let cond = cpu.flag(flags::ZERO);
    branch(cpu, bus, cond);
}

// ---------------------------------------------------------------------------
// Flag operations
// ---------------------------------------------------------------------------

fn exec_clc(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::CARRY, false);
}

fn exec_sec(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::CARRY, true);
}

fn exec_cli(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::IRQ_DISABLE, false);
}

fn exec_sei(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::IRQ_DISABLE, true);
}

fn exec_clv(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::OVERFLOW, false);
}

fn exec_cld(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::DECIMAL, false);
}

fn exec_sed(cpu: &mut Cpu, _bus: &mut dyn MemoryInterface) {
    cpu.set_flag(flags::DECIMAL, true);
}
