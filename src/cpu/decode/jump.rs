//! The conditional-jump and loop family: sixteen `0x70..=0x7F` conditional
//! jumps plus the four `0xE0..=0xE3` loop/jcxz instructions. Every member
//! is a fixed two-byte encoding: opcode, signed 8-bit displacement.

use super::instruction::{Instruction, InstructionType};
use super::operand::Operand;
use super::Decoded;
use crate::cpu::cursor::ByteCursor;
use crate::error::SimError;

const CONDITIONAL_JUMPS: [InstructionType; 16] = [
    InstructionType::Jo,
    InstructionType::Jno,
    InstructionType::Jb,
    InstructionType::Jnb,
    InstructionType::Je,
    InstructionType::Jne,
    InstructionType::Jbe,
    InstructionType::Ja,
    InstructionType::Js,
    InstructionType::Jns,
    InstructionType::Jp,
    InstructionType::Jnp,
    InstructionType::Jl,
    InstructionType::Jnl,
    InstructionType::Jle,
    InstructionType::Jg,
];

const LOOP_FAMILY: [InstructionType; 4] = [
    InstructionType::Loopnz,
    InstructionType::Loopz,
    InstructionType::Loop,
    InstructionType::Jcxz,
];

pub fn is_start(cursor: &ByteCursor) -> bool {
    let Some(byte) = cursor.peek_next() else { return false };
    (0x70..=0x7F).contains(&byte) || (0xE0..=0xE3).contains(&byte)
}

pub fn decode(cursor: &mut ByteCursor) -> Result<Decoded, SimError> {
    let byte = cursor.advance()?;
    let itype = if (0x70..=0x7F).contains(&byte) {
        CONDITIONAL_JUMPS[(byte - 0x70) as usize]
    } else {
        LOOP_FAMILY[(byte - 0xE0) as usize]
    };

    let disp = cursor.advance8()? as i8;
    let inst = Instruction::new(itype, Operand::Jump(disp), Operand::None);

    Ok(Decoded {
        inst,
        length: cursor.byte_stack().len(),
        field_annotation: format!("disp:{disp:3}"),
    })
}
