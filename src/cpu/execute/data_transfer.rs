//! `mov` and `lea`: pure data movement, no flag changes.

use super::{invalid_shape, read_value, shape_ok, write_value};
use crate::cpu::decode::effective_address;
use crate::cpu::decode::{InstructionType, Operand};
use crate::cpu::registers::RegisterFile;
use crate::error::{ExecutionFault, SimError};
use crate::memory::Memory;

pub fn execute(
    itype: InstructionType,
    dst: Operand,
    src: Operand,
    regs: &mut RegisterFile,
    mem: &mut Memory,
) -> Result<Option<ExecutionFault>, SimError> {
    if itype == InstructionType::Lea {
        return lea(dst, src, regs);
    }

    if !shape_ok(&dst, &src) {
        return Ok(Some(invalid_shape("mov", &dst, &src)));
    }

    let wide = dst.is_wide();
    let value = read_value(src, regs, mem)?;
    write_value(dst, regs, mem, value, wide)?;
    Ok(None)
}

/// `lea` never dereferences its source: the destination register receives
/// the effective address itself, not the memory contents there.
fn lea(dst: Operand, src: Operand, regs: &mut RegisterFile) -> Result<Option<ExecutionFault>, SimError> {
    let Operand::EffectiveAddress(info) = src else {
        return Ok(Some(invalid_shape("lea", &dst, &src)));
    };
    let Operand::Register(reg, usage) = dst else {
        return Ok(Some(invalid_shape("lea", &dst, &src)));
    };

    let addr = effective_address::resolve(regs, info.base, info.disp.sign_extended());
    regs.set(reg, usage, addr as u16);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::{EaBase, EaInfo, Immediate};
    use crate::cpu::registers::{Reg, RegUsage};

    #[test]
    fn mov_register_to_register() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::B, 0x1234);
        let dst = Operand::Register(Reg::A, RegUsage::Word);
        let src = Operand::Register(Reg::B, RegUsage::Word);
        execute(InstructionType::Mov, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 0x1234);
    }

    #[test]
    fn lea_writes_address_not_memory_contents() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::B, 0x0010);
        mem.write_u16(0x0011, 0xBEEF).unwrap();
        let dst = Operand::Register(Reg::A, RegUsage::Word);
        let src = Operand::EffectiveAddress(EaInfo { base: EaBase::Bx, disp: Immediate::Byte(1), wide: true });
        execute(InstructionType::Lea, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 0x0011);
    }
}
