//! Instruction execution: one handler module per family, sharing the
//! operand read/write helpers and the operand-shape check defined here.

pub mod arithmetic;
pub mod control_flow;
pub mod data_transfer;
pub mod logic;
pub mod mul_div;
pub mod shift;

use crate::cpu::decode::effective_address;
use crate::cpu::decode::{EaInfo, Immediate, Instruction, InstructionType, Operand};
use crate::cpu::registers::RegisterFile;
use crate::error::{ExecutionFault, SimError};
use crate::memory::Memory;

/// The legal operand-shape pairs the executor accepts, per the component
/// design: register destination from anything, memory destination from
/// register or immediate (never memory-to-memory).
fn shape_ok(dst: &Operand, src: &Operand) -> bool {
    matches!(
        (dst, src),
        (Operand::Register(..), Operand::Register(..))
            | (Operand::Register(..), Operand::Immediate(_))
            | (Operand::Register(..), Operand::EffectiveAddress(_))
            | (Operand::EffectiveAddress(_), Operand::Register(..))
            | (Operand::EffectiveAddress(_), Operand::Immediate(_))
    )
}

fn invalid_shape(mnemonic: &'static str, dst: &Operand, src: &Operand) -> ExecutionFault {
    ExecutionFault::InvalidOperandShape {
        mnemonic,
        dst_kind: dst.kind_name(),
        src_kind: src.kind_name(),
    }
}

fn ea_address(regs: &RegisterFile, info: &EaInfo) -> u32 {
    effective_address::resolve(regs, info.base, info.disp.sign_extended())
}

/// Reads the value an operand names. `lea`'s source is handled separately
/// since it wants the address itself, not the memory contents there.
fn read_value(op: Operand, regs: &RegisterFile, mem: &Memory) -> Result<u16, SimError> {
    match op {
        Operand::Register(reg, usage) => Ok(regs.get(reg, usage)),
        Operand::Immediate(imm) => Ok(imm.as_u16()),
        Operand::EffectiveAddress(info) => {
            let addr = ea_address(regs, &info);
            if info.wide {
                mem.read_u16(addr)
            } else {
                mem.read_u8(addr).map(|b| b as u16)
            }
        }
        Operand::None | Operand::Jump(_) => unreachable!("not a value operand"),
    }
}

fn write_value(op: Operand, regs: &mut RegisterFile, mem: &mut Memory, value: u16, wide: bool) -> Result<(), SimError> {
    match op {
        Operand::Register(reg, usage) => {
            regs.set(reg, usage, value);
            Ok(())
        }
        Operand::EffectiveAddress(info) => {
            let addr = ea_address(regs, &info);
            if wide {
                mem.write_u16(addr, value)
            } else {
                mem.write_u8(addr, value as u8)
            }
        }
        _ => unreachable!("not a writable operand"),
    }
}

/// Reads a value-bearing operand's current contents for callers outside
/// the executor (the driver's before/after trace). Jump displacements and
/// the empty operand have no readable value.
pub(crate) fn value_of(op: Operand, regs: &RegisterFile, mem: &Memory) -> Option<u16> {
    match op {
        Operand::Jump(_) | Operand::None => None,
        other => read_value(other, regs, mem).ok(),
    }
}

/// Runs one decoded instruction's effects. Returns `Ok(None)` on a clean
/// execution, `Ok(Some(fault))` for a recoverable executor-level problem
/// (the driver prints it and moves on), or `Err` for a hard memory fault.
pub fn execute(inst: &Instruction, regs: &mut RegisterFile, mem: &mut Memory) -> Result<Option<ExecutionFault>, SimError> {
    use InstructionType::*;

    match inst.itype {
        Mov | Lea => data_transfer::execute(inst.itype, inst.dst, inst.src, regs, mem),
        Add | Sub | Cmp => arithmetic::execute(inst.itype, inst.dst, inst.src, regs, mem),
        And | Or | Xor | Test | Not => logic::execute(inst.itype, inst.dst, inst.src, regs, mem),
        Shl | Shr | Sar => shift::execute(inst.itype, inst.dst, inst.src, regs, mem),
        Mul | Imul | Div | Idiv => mul_div::execute(inst.itype, inst.dst, regs, mem),
        itype if itype.is_conditional_jump() || itype.is_loop_family() => {
            let disp = match inst.dst {
                Operand::Jump(disp) => disp,
                other => unreachable!("jump family always carries Operand::Jump, got {other:?}"),
            };
            control_flow::execute(itype, disp, regs);
            Ok(None)
        }
        None => Ok(None),
    }
}
