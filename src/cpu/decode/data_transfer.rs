//! The `mov` family: five encodings, tried in the order the spec lists them.

use super::{accumulator, read_modrm, reg_operand, rm_operand, seg_operand, Decoded};
use super::instruction::{Instruction, InstructionType};
use super::operand::{EaBase, EaInfo, Immediate, Operand};
use crate::cpu::cursor::ByteCursor;
use crate::error::SimError;

pub fn is_start(cursor: &ByteCursor) -> bool {
    let Some(byte) = cursor.peek_next() else { return false };
    byte >> 2 == 0b100010
        || byte >> 1 == 0b1100011
        || byte >> 4 == 0b1011
        || byte >> 2 == 0b101000
        || byte == 0b1000_1110
        || byte == 0b1000_1100
}

pub fn decode(cursor: &mut ByteCursor) -> Result<Decoded, SimError> {
    let byte = cursor.advance()?;

    let (inst, field_annotation) = if byte >> 2 == 0b100010 {
        reg_mem_to_from_reg(cursor, byte)?
    } else if byte >> 1 == 0b1100011 {
        imm_to_reg_mem(cursor, byte)?
    } else if byte >> 4 == 0b1011 {
        imm_to_reg(cursor, byte)?
    } else if byte >> 2 == 0b101000 {
        mem_to_from_accumulator(cursor, byte)?
    } else {
        seg_reg_to_from_reg_mem(cursor, byte)?
    };

    Ok(Decoded {
        inst,
        length: cursor.byte_stack().len(),
        field_annotation,
    })
}

/// Encoding 1: `100010 d w` ModR/M — register/memory to/from register.
fn reg_mem_to_from_reg(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
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
    Ok((Instruction::new(InstructionType::Mov, dst, src), annotation))
}

/// Encoding 2: `1100011 w` ModR/M imm — immediate to register/memory.
fn imm_to_reg_mem(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let w = byte & 1 != 0;
    let fields = read_modrm(cursor)?;
    let dst = rm_operand(cursor, fields, w)?;
    let imm = cursor.advance8_or_16(w)?;
    let src = Operand::Immediate(if w {
        Immediate::Word(imm as i16)
    } else {
        Immediate::Byte(imm as u8 as i8)
    });
    let annotation = format!("W:{} MOD:{:02b} R/M:{:03b}", w as u8, fields.mod_bits, fields.rm);
    Ok((Instruction::new(InstructionType::Mov, dst, src), annotation))
}

/// Encoding 3: `1011 w reg` imm — immediate to register.
fn imm_to_reg(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let w = (byte >> 3) & 1 != 0;
    let reg = byte & 0b111;
    let imm = cursor.advance8_or_16(w)?;
    let dst = reg_operand(reg, w);
    let src = Operand::Immediate(if w {
        Immediate::Word(imm as i16)
    } else {
        Immediate::Byte(imm as u8 as i8)
    });
    let annotation = format!("W:{} REG:{:03b}", w as u8, reg);
    Ok((Instruction::new(InstructionType::Mov, dst, src), annotation))
}

/// Encoding 4: `101000 d w` disp16 — memory (direct address) to/from accumulator.
fn mem_to_from_accumulator(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let d = (byte >> 1) & 1 != 0;
    let w = byte & 1 != 0;
    let addr = cursor.advance16()?;

    let mem = Operand::EffectiveAddress(EaInfo {
        base: EaBase::Direct,
        disp: Immediate::Word(addr as i16),
        wide: true,
    });
    let acc = accumulator(w);

    let (dst, src) = if d { (mem, acc) } else { (acc, mem) };
    let annotation = format!("W:{}", w as u8);
    Ok((Instruction::new(InstructionType::Mov, dst, src), annotation))
}

/// Encoding 5: `10001110` / `10001100` ModR/M — segment register to/from r/m.
fn seg_reg_to_from_reg_mem(cursor: &mut ByteCursor, byte: u8) -> Result<(Instruction, String), SimError> {
    let d = (byte >> 1) & 1 != 0;
    let fields = read_modrm(cursor)?;
    let sr = seg_operand(fields.reg & 0b11);
    let rm = rm_operand(cursor, fields, true)?;

    let (dst, src) = if d { (sr, rm) } else { (rm, sr) };
    let annotation = format!("D:{} MOD:{:02b} SR:{:02b} R/M:{:03b}", d as u8, fields.mod_bits, fields.reg & 0b11, fields.rm);
    Ok((Instruction::new(InstructionType::Mov, dst, src), annotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::registers::{Reg, RegUsage};

    #[test]
    fn reg_to_reg_decodes_mov_ax_bx() {
        let input = [0x89, 0xD8];
        let mut cursor = ByteCursor::new(&input);
        let decoded = decode(&mut cursor).unwrap();
        assert_eq!(decoded.inst.itype, InstructionType::Mov);
        assert_eq!(decoded.inst.dst, Operand::Register(Reg::A, RegUsage::Word));
        assert_eq!(decoded.inst.src, Operand::Register(Reg::B, RegUsage::Word));
        assert_eq!(decoded.length, 2);
    }

    #[test]
    fn imm_to_reg_decodes_mov_ax_1337() {
        let input = [0xB8, 0x39, 0x05];
        let mut cursor = ByteCursor::new(&input);
        let decoded = decode(&mut cursor).unwrap();
        assert_eq!(decoded.inst.dst, Operand::Register(Reg::A, RegUsage::Word));
        assert_eq!(decoded.inst.src, Operand::Immediate(Immediate::Word(0x0539)));
        assert_eq!(decoded.length, 3);
    }

    #[test]
    fn imm_to_mem_direct_address_scenario_6() {
        let input = [0xC7, 0x06, 0x39, 0x05, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&input);
        let decoded = decode(&mut cursor).unwrap();
        assert_eq!(decoded.inst.itype, InstructionType::Mov);
        match decoded.inst.dst {
            Operand::EffectiveAddress(EaInfo { base: EaBase::Direct, disp: Immediate::Word(0x0539), wide: true }) => {}
            other => panic!("unexpected dst {other:?}"),
        }
        assert_eq!(decoded.inst.src, Operand::Immediate(Immediate::Word(0x1234)));
        assert_eq!(decoded.length, 6);
    }
}
