//! Instruction decoding: the byte cursor's consumer.
//!
//! Three family decoders (data-movement, jump/loop, arithmetic/logic) each
//! expose an `is_start(cursor)` predicate and a `decode(cursor)` producer.
//! The top-level [`decode_one`] walks them in the fixed precedence order
//! the spec requires and is the only place that owns that order.

pub mod arithmetic;
pub mod data_transfer;
pub mod effective_address;
pub mod instruction;
pub mod jump;
pub mod operand;

pub use instruction::{Decoded, Instruction, InstructionType};
pub use operand::{EaBase, EaInfo, Immediate, Operand};

use crate::cpu::cursor::ByteCursor;
use crate::cpu::registers::{Reg, RegUsage, REG_TABLE, SR_TABLE};
use crate::error::SimError;

/// Fields pulled out of a ModR/M byte.
#[derive(Debug, Clone, Copy)]
pub struct ModRmFields {
    pub mod_bits: u8,
    pub reg: u8,
    pub rm: u8,
}

/// Reads one ModR/M byte and splits it into its three fields.
pub fn read_modrm(cursor: &mut ByteCursor) -> Result<ModRmFields, SimError> {
    let byte = cursor.advance()?;
    Ok(ModRmFields {
        mod_bits: (byte >> 6) & 0b11,
        reg: (byte >> 3) & 0b111,
        rm: byte & 0b111,
    })
}

/// Builds the r/m-side operand for a ModR/M byte already read into
/// `fields`: a register in register mode, or an effective address (with
/// its displacement consumed from the cursor) otherwise.
pub fn rm_operand(cursor: &mut ByteCursor, fields: ModRmFields, wide: bool) -> Result<Operand, SimError> {
    if fields.mod_bits == 0b11 {
        let (reg, usage) = REG_TABLE[fields.rm as usize][wide as usize];
        return Ok(Operand::Register(reg, usage));
    }

    let base = if fields.mod_bits == 0b00 && fields.rm == 0b110 {
        EaBase::Direct
    } else {
        operand::EFFECTIVE_ADDRESS_TABLE[fields.rm as usize]
    };

    let disp_bits = cursor.advance_disp(fields.mod_bits, fields.rm)?;
    let disp = if fields.mod_bits == 0b01 {
        Immediate::Byte(disp_bits as u8 as i8)
    } else {
        Immediate::Word(disp_bits as i16)
    };

    Ok(Operand::EffectiveAddress(EaInfo { base, disp, wide }))
}

/// The general-purpose register operand selected by `reg`/`w`.
pub fn reg_operand(reg: u8, wide: bool) -> Operand {
    let (r, usage) = REG_TABLE[reg as usize][wide as usize];
    Operand::Register(r, usage)
}

/// The segment-register operand selected by the 2-bit `sr` field.
pub fn seg_operand(sr: u8) -> Operand {
    Operand::Register(SR_TABLE[sr as usize], RegUsage::Word)
}

pub fn accumulator(wide: bool) -> Operand {
    reg_operand(0b000, wide)
}

type Predicate = fn(&ByteCursor) -> bool;
type DecodeFn = fn(&mut ByteCursor) -> Result<Decoded, SimError>;

const FAMILIES: [(Predicate, DecodeFn); 3] = [
    (data_transfer::is_start, data_transfer::decode),
    (jump::is_start, jump::decode),
    (arithmetic::is_start, arithmetic::decode),
];

/// Routes the next instruction to its owning family, in the spec's fixed
/// precedence order (data-movement, then jump/loop, then arithmetic/logic).
/// Fails with [`SimError::UnrecognizedOpcode`] if no family claims the byte.
pub fn decode_one(cursor: &mut ByteCursor) -> Result<Decoded, SimError> {
    let first_byte = cursor
        .peek_next()
        .ok_or(SimError::CursorExhausted { offset: cursor.offset(), needed: 1 })?;

    for (is_start, decode) in FAMILIES {
        if is_start(cursor) {
            let offset_before = cursor.offset();
            let result = decode(cursor);
            return result.map_err(|e| match e {
                SimError::CursorExhausted { needed, .. } => SimError::CursorExhausted {
                    offset: offset_before,
                    needed,
                },
                other => other,
            });
        }
    }

    Err(SimError::UnrecognizedOpcode {
        byte: first_byte,
        offset: cursor.offset(),
    })
}
