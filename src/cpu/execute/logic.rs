//! `and`, `or`, `xor`, `test`, `not`: bitwise ops. The three binary ops and
//! `test` clear CF/OF and set Z/P/S from the result; `test` discards its
//! result and `not` leaves every flag untouched.

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
    if itype == InstructionType::Not {
        return not(dst, regs, mem);
    }

    if !shape_ok(&dst, &src) {
        return Ok(Some(invalid_shape(itype.mnemonic(), &dst, &src)));
    }

    let wide = dst.is_wide();
    let a = read_value(dst, regs, mem)?;
    let b = read_value(src, regs, mem)?;

    let result = match itype {
        InstructionType::And | InstructionType::Test => a & b,
        InstructionType::Or => a | b,
        InstructionType::Xor => a ^ b,
        _ => unreachable!(),
    };
    let masked = if wide { result } else { result & 0xFF };

    regs.set_result_flags(masked);
    regs.set_flag(flag_bit::CF, false);
    regs.set_flag(flag_bit::OF, false);

    if itype != InstructionType::Test {
        write_value(dst, regs, mem, result, wide)?;
    }
    Ok(None)
}

/// `not` never touches a flag: pure bitwise complement, no status output.
fn not(dst: Operand, regs: &mut RegisterFile, mem: &mut Memory) -> Result<Option<ExecutionFault>, SimError> {
    if !matches!(dst, Operand::Register(..) | Operand::EffectiveAddress(_)) {
        return Ok(Some(invalid_shape("not", &dst, &Operand::None)));
    }
    let wide = dst.is_wide();
    let value = read_value(dst, regs, mem)?;
    let result = if wide { !value } else { !value & 0xFF };
    write_value(dst, regs, mem, result, wide)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::Immediate;
    use crate::cpu::registers::{Reg, RegUsage};

    #[test]
    fn and_clears_carry_and_overflow() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_flag(flag_bit::CF, true);
        regs.set_flag(flag_bit::OF, true);
        regs.set_word(Reg::A, 0xFF00);
        let dst = Operand::Register(Reg::A, RegUsage::Word);
        let src = Operand::Immediate(Immediate::Word(0x0F00));
        execute(InstructionType::And, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 0x0F00);
        assert!(!regs.flag(flag_bit::CF));
        assert!(!regs.flag(flag_bit::OF));
    }

    #[test]
    fn test_discards_result() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::A, 0b1010);
        let dst = Operand::Register(Reg::A, RegUsage::Word);
        let src = Operand::Immediate(Immediate::Word(0b0101));
        execute(InstructionType::Test, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 0b1010);
        assert!(regs.flag(flag_bit::ZF));
    }

    #[test]
    fn not_complements_without_touching_flags() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_flag(flag_bit::ZF, true);
        regs.set_word(Reg::A, 0x00FF);
        let dst = Operand::Register(Reg::A, RegUsage::Word);
        execute(InstructionType::Not, dst, Operand::None, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 0xFF00);
        assert!(regs.flag(flag_bit::ZF));
    }
}
