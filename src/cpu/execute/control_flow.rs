//! Conditional jumps and the `loop` family: predicate evaluation plus the
//! instruction-pointer adjustment for a taken branch. `disp` is the raw
//! signed displacement byte from the encoding; the driver has already (or
//! will, the order doesn't matter since addition commutes) advanced `ip`
//! past this instruction's own length, so adding `disp` here lands on the
//! ISA-defined target of `ip_of_next_instruction + disp`.

use crate::cpu::decode::InstructionType;
use crate::cpu::registers::{flag_bit, Reg, RegisterFile};

pub fn execute(itype: InstructionType, disp: i8, regs: &mut RegisterFile) {
    use InstructionType::*;

    let taken = match itype {
        Jo => regs.flag(flag_bit::OF),
        Jno => !regs.flag(flag_bit::OF),
        Jb => regs.flag(flag_bit::CF),
        Jnb => !regs.flag(flag_bit::CF),
        Je => regs.flag(flag_bit::ZF),
        Jne => !regs.flag(flag_bit::ZF),
        Jbe => regs.flag(flag_bit::ZF) || regs.flag(flag_bit::CF),
        Ja => !(regs.flag(flag_bit::ZF) || regs.flag(flag_bit::CF)),
        Js => regs.flag(flag_bit::SF),
        Jns => !regs.flag(flag_bit::SF),
        Jp => regs.flag(flag_bit::PF),
        Jnp => !regs.flag(flag_bit::PF),
        Jl => regs.flag(flag_bit::SF) != regs.flag(flag_bit::OF),
        Jnl => regs.flag(flag_bit::SF) == regs.flag(flag_bit::OF),
        Jle => regs.flag(flag_bit::SF) != regs.flag(flag_bit::OF) || regs.flag(flag_bit::ZF),
        Jg => regs.flag(flag_bit::SF) == regs.flag(flag_bit::OF) && !regs.flag(flag_bit::ZF),
        Loop => decrement_cx(regs) != 0,
        Loopz => {
            let nonzero = decrement_cx(regs) != 0;
            nonzero && regs.flag(flag_bit::ZF)
        }
        Loopnz => {
            let nonzero = decrement_cx(regs) != 0;
            nonzero && !regs.flag(flag_bit::ZF)
        }
        Jcxz => regs.word(Reg::C) == 0,
        _ => unreachable!("execute::execute only dispatches jump/loop instructions here"),
    };

    if taken {
        regs.inc_ip(disp as i32);
    }
}

fn decrement_cx(regs: &mut RegisterFile) -> u16 {
    let cx = regs.word(Reg::C).wrapping_sub(1);
    regs.set_word(Reg::C, cx);
    cx
}
