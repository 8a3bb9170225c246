//! `add`, `sub`, `cmp`: eager ZF/PF/SF plus carry-on-unsigned-overflow.
//! `cmp` computes the same subtraction as `sub` but discards the result.

use super::{invalid_shape, read_value, shape_ok, write_value};
use crate::cpu::decode::{InstructionType, Operand};
use crate::cpu::registers::{flag_bit, RegisterFile};
use crate::error::{ExecutionFault, SimError};
use crate::memory::Memory;

pub fn execute(
    itype: InstructionType,
    dst: Operand,
    src: Operand,
    regs: &mut RegisterFile,
    mem: &mut Memory,
) -> Result<Option<ExecutionFault>, SimError> {
    if !shape_ok(&dst, &src) {
        return Ok(Some(invalid_shape(itype.mnemonic(), &dst, &src)));
    }

    let wide = dst.is_wide();
    let a = read_value(dst, regs, mem)?;
    let b = read_value(src, regs, mem)?;

    let (result, carry) = if wide {
        match itype {
            InstructionType::Add => a.overflowing_add(b),
            InstructionType::Sub | InstructionType::Cmp => a.overflowing_sub(b),
            _ => unreachable!(),
        }
    } else {
        let (r, c) = match itype {
            InstructionType::Add => (a as u8).overflowing_add(b as u8),
            InstructionType::Sub | InstructionType::Cmp => (a as u8).overflowing_sub(b as u8),
            _ => unreachable!(),
        };
        (r as u16, c)
    };

    let masked = if wide { result } else { result & 0xFF };
    regs.set_result_flags(masked);
    regs.set_flag(flag_bit::CF, carry);

    if itype != InstructionType::Cmp {
        write_value(dst, regs, mem, result, wide)?;
    }
    Ok(None)
}
