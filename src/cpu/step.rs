//! The single decode-then-maybe-execute step shared by the full-stream
//! driver and the test harness's single-step interface, so the two never
//! drift on IP/clock bookkeeping.

use crate::cpu::cursor::ByteCursor;
use crate::cpu::decode::{self, effective_address, Instruction, Operand};
use crate::cpu::execute;
use crate::cpu::state::SimulatorState;
use crate::cpu::timing::{self, ClockCalculation};
use crate::error::{ExecutionFault, SimError};

/// One decoded (and, if requested, executed) instruction. The cursor's
/// byte stack is left untouched so a caller can still read it (for the
/// decode-only trace) before resetting it for the next instruction.
pub struct StepOutcome {
    pub inst: Instruction,
    pub length: usize,
    pub field_annotation: String,
    pub fault: Option<ExecutionFault>,
    pub clocks: ClockCalculation,
    /// The destination operand's value just before and just after
    /// execution; `None` for a jump/loop instruction (no value-bearing
    /// destination) or when `step` was asked only to decode.
    pub dst_before: Option<u16>,
    pub dst_after: Option<u16>,
}

/// Extra clock cycles for a 16-bit transfer through an odd address, the
/// one part of the clock model that needs live register state rather than
/// just the decoded operand shapes.
fn odd_address_extra(inst: &Instruction, state: &SimulatorState) -> u32 {
    [&inst.dst, &inst.src]
        .into_iter()
        .filter_map(|op| match op {
            Operand::EffectiveAddress(info) if info.wide => Some(info),
            _ => None,
        })
        .filter(|info| effective_address::resolve(&state.regs, info.base, info.disp.sign_extended()) % 2 != 0)
        .map(|_| 4)
        .sum()
}

/// Decodes one instruction at the cursor's current position and, if
/// `execute_it` is set, runs it. The instruction pointer is advanced by
/// the consumed byte count before the executor runs, so a taken branch's
/// own IP delta lands on `ip_of_next_instruction + displacement`.
pub fn step(cursor: &mut ByteCursor, state: &mut SimulatorState, execute_it: bool) -> Result<StepOutcome, SimError> {
    let decoded = decode::decode_one(cursor)?;
    let clocks = timing::calculate(decoded.inst.itype, &decoded.inst.dst, &decoded.inst.src);

    let (fault, dst_before, dst_after) = if execute_it {
        let dst_before = execute::value_of(decoded.inst.dst, &state.regs, &state.mem);
        let extra = odd_address_extra(&decoded.inst, state);
        state.regs.inc_ip(decoded.length as i32);
        let fault = execute::execute(&decoded.inst, &mut state.regs, &mut state.mem)?;
        state.clock += clocks.total() as u64 + extra as u64;
        let dst_after = execute::value_of(decoded.inst.dst, &state.regs, &state.mem);
        (fault, dst_before, dst_after)
    } else {
        (None, None, None)
    };

    Ok(StepOutcome {
        inst: decoded.inst,
        length: decoded.length,
        field_annotation: decoded.field_annotation,
        fault,
        clocks,
        dst_before,
        dst_after,
    })
}
