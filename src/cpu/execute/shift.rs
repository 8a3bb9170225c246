//! `shl`, `shr`, `sar`: the three modeled shift instructions. Count 0 is a
//! documented no-op (leaves the destination and every flag untouched, not
//! just the carry); rotates are out of scope and never reach this module
//! since the decoder maps their opcode-extension bits to `None`.

use super::{invalid_shape, read_value, write_value};
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
    if !matches!(dst, Operand::Register(..) | Operand::EffectiveAddress(_)) {
        return Ok(Some(invalid_shape(itype.mnemonic(), &dst, &src)));
    }

    let count = read_value(src, regs, mem)? as u8;
    if count == 0 {
        return Ok(None);
    }

    let wide = dst.is_wide();
    let value = read_value(dst, regs, mem)?;
    let width = if wide { 16 } else { 8 };
    let count = count as u32;

    let (result, carry_out) = match itype {
        InstructionType::Shl => {
            let shifted = if count >= 32 { 0 } else { (value as u32) << count };
            let carry = count >= 1 && count <= width && (shifted & (1 << width)) != 0;
            (shifted as u16, carry)
        }
        InstructionType::Shr => {
            let carry = count >= 1 && count <= width && (value as u32 & (1 << (count - 1))) != 0;
            let shifted = if count >= width { 0 } else { value >> count };
            (shifted, carry)
        }
        InstructionType::Sar => {
            let sign_extended = if wide { value as i16 as i32 } else { value as u8 as i8 as i32 };
            let carry = count >= 1 && count <= width && (value as u32 & (1 << (count - 1))) != 0;
            let shifted = if count >= width {
                if sign_extended < 0 { -1i32 } else { 0 }
            } else {
                sign_extended >> count
            };
            (shifted as u16, carry)
        }
        _ => unreachable!("execute::execute only dispatches shl/shr/sar here"),
    };

    let masked = if wide { result } else { result & 0xFF };
    regs.set_result_flags(masked);
    regs.set_flag(flag_bit::CF, carry_out);
    write_value(dst, regs, mem, masked, wide)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::Immediate;
    use crate::cpu::registers::{Reg, RegUsage};

    #[test]
    fn shl_by_one_shifts_and_sets_carry_from_vacated_bit() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::A, 0x8000);
        let dst = Operand::Register(Reg::A, RegUsage::Word);
        let src = Operand::Immediate(Immediate::Byte(1));
        execute(InstructionType::Shl, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 0);
        assert!(regs.flag(flag_bit::CF));
        assert!(regs.flag(flag_bit::ZF));
    }

    #[test]
    fn shr_zero_fills_from_the_top() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_low(Reg::A, 0b1000_0001);
        let dst = Operand::Register(Reg::A, RegUsage::Low);
        let src = Operand::Immediate(Immediate::Byte(1));
        execute(InstructionType::Shr, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.low(Reg::A), 0b0100_0000);
        assert!(regs.flag(flag_bit::CF));
    }

    #[test]
    fn sar_sign_extends_from_the_top() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_low(Reg::A, 0b1000_0000);
        let dst = Operand::Register(Reg::A, RegUsage::Low);
        let src = Operand::Immediate(Immediate::Byte(2));
        execute(InstructionType::Sar, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.low(Reg::A), 0b1110_0000);
    }

    #[test]
    fn count_of_zero_leaves_destination_and_flags_untouched() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::A, 0x1234);
        regs.set_flag(flag_bit::ZF, true);
        let dst = Operand::Register(Reg::A, RegUsage::Word);
        let src = Operand::Immediate(Immediate::Byte(0));
        execute(InstructionType::Shl, dst, src, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 0x1234);
        assert!(regs.flag(flag_bit::ZF));
    }
}
