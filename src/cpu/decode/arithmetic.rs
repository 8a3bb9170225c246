//! The arithmetic/logic family: `add`, `sub`, `cmp`, `and`, `or`, `xor`,
//! `test` (three-variant, format 0/1/2) plus the single-variant ops `lea`,
//! `mul`, `imul`, `div`, `idiv`, `not`, `shl`, `shr`, `sar`.

use super::instruction::{Instruction, InstructionType};
use super::operand::{Immediate, Operand};
use super::{accumulator, read_modrm, reg_operand, rm_operand, Decoded};
use crate::cpu::cursor::ByteCursor;
use crate::error::SimError;

fn format1_op(reg: u8) -> Option<InstructionType> {
    use InstructionType::*;
    match reg {
        0b000 => Some(Add),
        0b001 => Some(Or),
        0b100 => Some(And),
        0b101 => Some(Sub),
        0b110 => Some(Xor),
        0b111 => Some(Cmp),
        _ => None, // 010/011 would be adc/sbb, out of scope
    }
}

fn group_f6_f7_op(reg: u8) -> Option<InstructionType> {
    use InstructionType::*;
    match reg {
        0b000 | 0b001 => Some(Test),
        0b010 => Some(Not),
        0b100 => Some(Mul),
        0b101 => Some(Imul),
        0b110 => Some(Div),
        0b111 => Some(Idiv),
        _ => None, // 011 would be neg, out of scope
    }
}

fn group_d0_d3_op(reg: u8) -> Option<InstructionType> {
    use InstructionType::*;
    match reg {
        0b100 | 0b110 => Some(Shl),
        0b101 => Some(Shr),
        0b111 => Some(Sar),
        _ => None, // 000/001/010/011 are rotates, out of scope
    }
}

fn peek_reg_field(cursor: &ByteCursor) -> Option<u8> {
    cursor.peek_ahead(1).map(|b| (b >> 3) & 0b111)
}

pub fn is_start(cursor: &ByteCursor) -> bool {
    let Some(byte) = cursor.peek_next() else { return false };
    match byte {
        0x00..=0x03
        | 0x08..=0x0B
        | 0x20..=0x23
        | 0x28..=0x2B
        | 0x30..=0x33
        | 0x38..=0x3B
        | 0x84
        | 0x85
        | 0x04
        | 0x05
        | 0x0C
        | 0x0D
        | 0x24
        | 0x25
        | 0x2C
        | 0x2D
        | 0x34
        | 0x35
        | 0x3C
        | 0x3D
        | 0xA8
        | 0xA9
        | 0x8D => true,
        0x80..=0x83 => peek_reg_field(cursor).is_some_and(|reg| format1_op(reg).is_some()),
        0xF6 | 0xF7 => peek_reg_field(cursor).is_some_and(|reg| group_f6_f7_op(reg).is_some()),
        0xD0..=0xD3 => peek_reg_field(cursor).is_some_and(|reg| group_d0_d3_op(reg).is_some()),
        _ => false,
    }
}

pub fn decode(cursor: &mut ByteCursor) -> Result<Decoded, SimError> {
    let byte = cursor.advance()?;

    let (inst, annotation) = match byte {
        0x00..=0x03 => format0(cursor, byte, InstructionType::Add)?,
        0x08..=0x0B => format0(cursor, byte, InstructionType::Or)?,
        0x20..=0x23 => format0(cursor, byte, InstructionType::And)?,
        0x28..=0x2B => format0(cursor, byte, InstructionType::Sub)?,
        0x30..=0x33 => format0(cursor, byte, InstructionType::Xor)?,
        0x38..=0x3B => format0(cursor, byte, InstructionType::Cmp)?,
        0x84 | 0x85 => test_format0(cursor, byte)?,
        0x04 | 0x05 => format2(cursor, byte, InstructionType::Add)?,
        0x0C | 0x0D => format2(cursor, byte, InstructionType::Or)?,
        0x24 | 0x25 => format2(cursor, byte, InstructionType::And)?,
        0x2C | 0x2D => format2(cursor, byte, InstructionType::Sub)?,
        0x34 | 0x35 => format2(cursor, byte, InstructionType::Xor)?,
        0x3C | 0x3D => format2(cursor, byte, InstructionType::Cmp)?,
        0xA8 | 0xA9 => format2(cursor, byte, InstructionType::Test)?,
        0x80..=0x83 => format1(cursor, byte)?,
        0x8D => lea(cursor)?,
        0xF6 | 0xF7 => group_f6_f7(cursor, byte)?,
        0xD0..=0xD3 => group_d0_d3(cursor, byte)?,
        _ => unreachable!("is_start guarantees one of the above matches"),
    };

    Ok(Decoded {
        inst,
        length: cursor.byte_stack().len(),
        field_annotation: annotation,
    })
}

/// Format 0: `xxxxxx d w` ModR/M — reg/mem with register, either direction.
fn format0(cursor: &mut ByteCursor, byte: u8, itype: InstructionType) -> Result<(Instruction, String), SimError> {
    let d = (byte >> 1) & 1 != 0;
    let w = byte & 1 != 0;
    let fields = read_modrm(cursor)?;
    let reg = reg_operand(fields.reg, w);
    let rm = rm_operand(cursor, fields, w)?;
    let (dst, src) = if d { (reg, rm) } else { (rm, reg) };
    let annotation = format!(
        "D:{} W:{} MOD:{:02b} REG:{:03b} R/M:{:03b}",
        d as u8, w as u8, fields.mod_bits, fields.reg, fields.rm
    );
    Ok((Instruction::new(itype, dst, src), annotation))
}

/// `test`'s format-0 variant has no direction bit: the register operand is
/// always the source, matching the real ISA's fixed-direction encoding.
fn test_format0(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let w = byte & 1 != 0;
    let fields = read_modrm(cursor)?;
    let reg = reg_operand(fields.reg, w);
    let rm = rm_operand(cursor, fields, w)?;
    let annotation = format!(
        "W:{} MOD:{:02b} REG:{:03b} R/M:{:03b}",
        w as u8, fields.mod_bits, fields.reg, fields.rm
    );
    Ok((Instruction::new(InstructionType::Test, rm, reg), annotation))
}

/// Format 1: `xxxxxx s w` ModR/M imm — immediate to register/memory, op
/// selected by the ModR/M reg-extension field.
fn format1(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let s = (byte >> 1) & 1 != 0;
    let w = byte & 1 != 0;
    let fields = read_modrm(cursor)?;
    let itype = format1_op(fields.reg).expect("is_start filtered to modeled ops");

    let dst = rm_operand(cursor, fields, w)?;
    let is_wide_imm = w && !s;
    let imm = cursor.advance8_or_16(is_wide_imm)?;
    let src = Operand::Immediate(if w {
        // `s=1` reads a single byte that must be sign-extended to 16 bits,
        // not zero-extended the way `advance8_or_16` left it.
        let word = if is_wide_imm { imm as i16 } else { (imm as u8 as i8) as i16 };
        Immediate::Word(word)
    } else {
        Immediate::Byte(imm as u8 as i8)
    });

    let annotation = format!(
        "S:{} W:{} MOD:{:02b} REG:{:03b} R/M:{:03b}",
        s as u8, w as u8, fields.mod_bits, fields.reg, fields.rm
    );
    Ok((Instruction::new(itype, dst, src), annotation))
}

/// Format 2: `xxxxxxx w` imm — immediate to accumulator.
fn format2(cursor: &mut ByteCursor, byte: u8, itype: InstructionType) -> Result<(Instruction, String), SimError> {
    let w = byte & 1 != 0;
    let imm = cursor.advance8_or_16(w)?;
    let dst = accumulator(w);
    let src = Operand::Immediate(if w {
        Immediate::Word(imm as i16)
    } else {
        Immediate::Byte(imm as u8 as i8)
    });
    let annotation = format!("W:{}", w as u8);
    Ok((Instruction::new(itype, dst, src), annotation))
}

/// `lea r16, m` (0x8D): decoded through the same ModR/M shape as format 0,
/// then the operands are swapped so the register side is always dst, per
/// the reference implementation's decode-then-swap handling of `lea`.
fn lea(cursor: &mut ByteCursor) -> Result<(Instruction, String), SimError> {
    let fields = read_modrm(cursor)?;
    let reg = reg_operand(fields.reg, true);
    let rm = rm_operand(cursor, fields, true)?;
    let annotation = format!("MOD:{:02b} REG:{:03b} R/M:{:03b}", fields.mod_bits, fields.reg, fields.rm);
    Ok((Instruction::new(InstructionType::Lea, reg, rm), annotation))
}

/// Opcode group 0xF6/0xF7: `test`, `not`, `mul`, `imul`, `div`, `idiv`,
/// selected by the ModR/M reg-extension field. `test` alone carries a
/// trailing immediate.
fn group_f6_f7(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let w = byte & 1 != 0;
    let fields = read_modrm(cursor)?;
    let itype = group_f6_f7_op(fields.reg).expect("is_start filtered to modeled ops");
    let rm = rm_operand(cursor, fields, w)?;

    let (dst, src) = if itype == InstructionType::Test {
        let imm = cursor.advance8_or_16(w)?;
        let imm_operand = Operand::Immediate(if w {
            Immediate::Word(imm as i16)
        } else {
            Immediate::Byte(imm as u8 as i8)
        });
        (rm, imm_operand)
    } else {
        (rm, Operand::None)
    };

    let annotation = format!("W:{} MOD:{:02b} REG:{:03b} R/M:{:03b}", w as u8, fields.mod_bits, fields.reg, fields.rm);
    Ok((Instruction::new(itype, dst, src), annotation))
}

/// Opcode group 0xD0-0xD3: `shl`, `shr`, `sar`, selected by the ModR/M
/// reg-extension field; the low V/W bit pair picks an immediate-1 count
/// (V=0) or the `cl` register count (V=1).
fn group_d0_d3(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let v = (byte >> 1) & 1 != 0;
    let w = byte & 1 != 0;
    let fields = read_modrm(cursor)?;
    let itype = group_d0_d3_op(fields.reg).expect("is_start filtered to modeled ops");
    let dst = rm_operand(cursor, fields, w)?;

    let src = if v {
        reg_operand(0b001, false) // cl
    } else {
        Operand::Immediate(Immediate::Byte(1))
    };

    let annotation = format!("V:{} W:{} MOD:{:02b} REG:{:03b} R/M:{:03b}", v as u8, w as u8, fields.mod_bits, fields.reg, fields.rm);
    Ok((Instruction::new(itype, dst, src), annotation))
}
