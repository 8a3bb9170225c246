//! `mul`, `imul`, `div`, `idiv`: the accumulator-pair multiply/divide
//! family. None of the four touch a flag; the ISA leaves them undefined
//! here and this implementation does not model any of them for these ops.

use super::{invalid_shape, read_value};
use crate::cpu::decode::{InstructionType, Operand};
use crate::cpu::registers::{Reg, RegisterFile};
use crate::error::{ExecutionFault, SimError};
use crate::memory::Memory;

/// `dst` is the decoded r/m operand carrying the multiplier/divisor; the
/// implicit accumulator side (`al`/`ax`, or `dx:ax` for the wide divide)
/// is read and written directly against the register file.
pub fn execute(
    itype: InstructionType,
    dst: Operand,
    regs: &mut RegisterFile,
    mem: &mut Memory,
) -> Result<Option<ExecutionFault>, SimError> {
    if !matches!(dst, Operand::Register(..) | Operand::EffectiveAddress(_)) {
        return Ok(Some(invalid_shape(itype.mnemonic(), &dst, &Operand::None)));
    }

    let wide = dst.is_wide();
    let operand = read_value(dst, regs, mem)?;

    match itype {
        InstructionType::Mul => {
            if wide {
                let result = regs.word(Reg::A) as u32 * operand as u32;
                regs.set_word(Reg::A, result as u16);
                regs.set_word(Reg::D, (result >> 16) as u16);
            } else {
                let result = regs.low(Reg::A) as u16 * (operand as u8) as u16;
                regs.set_word(Reg::A, result);
            }
            Ok(None)
        }
        InstructionType::Imul => {
            if wide {
                let result = regs.word(Reg::A) as i16 as i32 * operand as i16 as i32;
                let bits = result as u32;
                regs.set_word(Reg::A, bits as u16);
                regs.set_word(Reg::D, (bits >> 16) as u16);
            } else {
                let result = regs.low(Reg::A) as i8 as i16 * (operand as u8) as i8 as i16;
                regs.set_word(Reg::A, result as u16);
            }
            Ok(None)
        }
        InstructionType::Div => {
            if wide {
                let divisor = operand;
                if divisor == 0 {
                    return Ok(Some(ExecutionFault::DivideByZero { mnemonic: itype.mnemonic() }));
                }
                let dividend = ((regs.word(Reg::D) as u32) << 16) | regs.word(Reg::A) as u32;
                let quotient = dividend / divisor as u32;
                let remainder = dividend % divisor as u32;
                regs.set_word(Reg::A, quotient as u16);
                regs.set_word(Reg::D, remainder as u16);
            } else {
                let divisor = operand as u8;
                if divisor == 0 {
                    return Ok(Some(ExecutionFault::DivideByZero { mnemonic: itype.mnemonic() }));
                }
                let dividend = regs.word(Reg::A);
                let quotient = dividend / divisor as u16;
                let remainder = dividend % divisor as u16;
                regs.set_low(Reg::A, quotient as u8);
                regs.set_high(Reg::A, remainder as u8);
            }
            Ok(None)
        }
        InstructionType::Idiv => {
            if wide {
                let divisor = operand as i16;
                if divisor == 0 {
                    return Ok(Some(ExecutionFault::DivideByZero { mnemonic: itype.mnemonic() }));
                }
                let dividend = (((regs.word(Reg::D) as u32) << 16) | regs.word(Reg::A) as u32) as i32;
                let quotient = dividend / divisor as i32;
                let remainder = dividend % divisor as i32;
                regs.set_word(Reg::A, quotient as u16);
                regs.set_word(Reg::D, remainder as u16);
            } else {
                let divisor = operand as u8 as i8;
                if divisor == 0 {
                    return Ok(Some(ExecutionFault::DivideByZero { mnemonic: itype.mnemonic() }));
                }
                let dividend = regs.word(Reg::A) as i16;
                let quotient = dividend / divisor as i16;
                let remainder = dividend % divisor as i16;
                regs.set_low(Reg::A, quotient as u8);
                regs.set_high(Reg::A, remainder as u8);
            }
            Ok(None)
        }
        _ => unreachable!("execute::execute only dispatches mul/imul/div/idiv here"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::registers::RegUsage;

    #[test]
    fn mul_byte_produces_ax() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_low(Reg::A, 20);
        let dst = Operand::Register(Reg::B, RegUsage::Low);
        regs.set_low(Reg::B, 10);
        execute(InstructionType::Mul, dst, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 200);
    }

    #[test]
    fn div_word_splits_quotient_and_remainder() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::A, 17);
        regs.set_word(Reg::D, 0);
        let dst = Operand::Register(Reg::B, RegUsage::Word);
        regs.set_word(Reg::B, 5);
        execute(InstructionType::Div, dst, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.word(Reg::A), 3);
        assert_eq!(regs.word(Reg::D), 2);
    }

    #[test]
    fn div_by_zero_is_a_recoverable_fault() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::A, 17);
        let dst = Operand::Register(Reg::B, RegUsage::Word);
        regs.set_word(Reg::B, 0);
        let fault = execute(InstructionType::Div, dst, &mut regs, &mut mem).unwrap();
        assert!(matches!(fault, Some(ExecutionFault::DivideByZero { .. })));
    }

    #[test]
    fn idiv_byte_handles_negative_dividend() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set_word(Reg::A, (-17i16) as u16);
        let dst = Operand::Register(Reg::B, RegUsage::Low);
        regs.set_low(Reg::B, 5);
        execute(InstructionType::Idiv, dst, &mut regs, &mut mem).unwrap();
        assert_eq!(regs.low(Reg::A) as i8, -3);
        assert_eq!(regs.high(Reg::A) as i8, -2);
    }
}
