//! The driver loop: walks an input byte slice end to end, decoding (and,
//! if asked, executing) one instruction at a time, and writes one line per
//! instruction to an output sink. This is the only place that ties the
//! decoder, executor, clock model, and disassembly renderer together.

use std::io::Write;

use crate::cpu::{step, ByteCursor, SimulatorState};
use crate::disasm;
use crate::error::SimError;

/// Toggles threaded through the run, never read from globals: whether to
/// execute each instruction, whether to colorize the mnemonic stream, and
/// whether to append a clock-cycle breakdown to each line.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub execute: bool,
    pub decorate: bool,
    pub report_clocks: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            execute: false,
            decorate: false,
            report_clocks: false,
        }
    }
}

/// Runs the full decode/simulate loop over `bytes`, writing one line per
/// instruction to `out`. Returns `Err` for the three hard-failure kinds
/// (unrecognized opcode, out-of-range memory, cursor exhaustion), which
/// abort the run; a recoverable executor fault is printed as an annotation
/// and the loop continues with the next instruction.
pub fn run(bytes: &[u8], state: &mut SimulatorState, config: &RunConfig, out: &mut dyn Write) -> Result<(), SimError> {
    let mut cursor = ByteCursor::new(bytes);

    while cursor.has_bytes() {
        let ip_before = state.regs.ip();
        let flags_before = state.flags_letters();

        let outcome = step::step(&mut cursor, state, config.execute)?;
        let mnemonic = disasm::mnemonic_color(&disasm::mnemonic_line(&outcome.inst), config.decorate);

        if let Some(fault) = &outcome.fault {
            writeln!(out, "{mnemonic} ; {}", disasm::error_color(&fault.to_string(), config.decorate)).ok();
        } else if config.execute {
            let trace = disasm::ExecutionTrace {
                dst_name: disasm::dst_name(&outcome.inst.dst),
                dst_before: outcome.dst_before.unwrap_or(ip_before),
                dst_after: outcome.dst_after.unwrap_or_else(|| state.regs.ip()),
                ip_before,
                ip_after: state.regs.ip(),
                flags_before,
                flags_after: state.flags_letters(),
            };
            write!(out, "{mnemonic} ; {trace}").ok();
            report_clocks(out, &outcome, config);
            writeln!(out).ok();
        } else {
            write!(
                out,
                "{mnemonic} ; ({}) <- {}",
                outcome.field_annotation,
                disasm::byte_stack_binary(cursor.byte_stack())
            )
            .ok();
            report_clocks(out, &outcome, config);
            writeln!(out).ok();
        }

        // A taken branch moves the instruction pointer somewhere other than
        // just past this instruction's own bytes; resynchronize the cursor
        // to that target before the byte stack is cleared, so the next
        // iteration decodes starting at the branch target rather than
        // wherever the cursor happened to be sitting.
        if config.execute {
            let ip = state.regs.ip() as usize;
            if ip != cursor.offset() {
                cursor.seek(ip);
            }
        }
        cursor.reset();
    }

    if config.execute {
        for (name, value) in state.register_dump() {
            writeln!(out, "{name}: {value:#06x} ({value})").ok();
        }
        writeln!(out, "flags: {}", state.flags_letters()).ok();
    }

    Ok(())
}

fn report_clocks(out: &mut dyn Write, outcome: &step::StepOutcome, config: &RunConfig) {
    if config.report_clocks {
        let suffix = if outcome.clocks.is_exact() { "" } else { " (est)" };
        write!(out, " | clocks: {}{suffix}", outcome.clocks.total()).ok();
    }
}
