//! Renders decoded instructions and execution effects as the textual lines
//! described by the output format: mnemonic lines in both decode-only and
//! execute modes, plus the small pieces each mode composes from (operand
//! syntax, the byte-stack binary trace, the flag-letter transition).

use crate::cpu::decode::{EaBase, EaInfo, Immediate, Instruction, Operand};
use crate::cpu::registers::{Reg, RegUsage};

const ANSI_MNEMONIC: &str = "\x1b[36m";
const ANSI_ERROR: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Lowercase two-letter register name, honoring byte-usage on the four
/// general-purpose registers (`ax`/`al`/`ah` and friends).
fn reg_name(reg: Reg, usage: RegUsage) -> &'static str {
    use Reg::*;
    use RegUsage::*;
    match (reg, usage) {
        (A, Word) => "ax",
        (A, Low) => "al",
        (A, High) => "ah",
        (B, Word) => "bx",
        (B, Low) => "bl",
        (B, High) => "bh",
        (C, Word) => "cx",
        (C, Low) => "cl",
        (C, High) => "ch",
        (D, Word) => "dx",
        (D, Low) => "dl",
        (D, High) => "dh",
        (reg, _) => reg.name(),
    }
}

fn ea_base_name(base: EaBase) -> Option<&'static str> {
    match base {
        EaBase::Direct => None,
        EaBase::BxSi => Some("bx+si"),
        EaBase::BxDi => Some("bx+di"),
        EaBase::BpSi => Some("bp+si"),
        EaBase::BpDi => Some("bp+di"),
        EaBase::Si => Some("si"),
        EaBase::Di => Some("di"),
        EaBase::Bp => Some("bp"),
        EaBase::Bx => Some("bx"),
    }
}

fn ea_body(info: &EaInfo) -> String {
    match ea_base_name(info.base) {
        None => info.disp.as_u16().to_string(),
        Some(base) => {
            let disp = info.disp.sign_extended();
            match disp.cmp(&0) {
                std::cmp::Ordering::Equal => base.to_string(),
                std::cmp::Ordering::Greater => format!("{base}+{disp}"),
                std::cmp::Ordering::Less => format!("{base}-{}", disp.unsigned_abs()),
            }
        }
    }
}

fn format_operand(op: &Operand, width_prefix: bool) -> String {
    match op {
        Operand::None => String::new(),
        Operand::Register(reg, usage) => reg_name(*reg, *usage).to_string(),
        Operand::Immediate(imm) => imm.sign_extended().to_string(),
        Operand::Jump(disp) => {
            let target = *disp as i32 + 2;
            match target.cmp(&0) {
                std::cmp::Ordering::Less => format!("$-{}+0", target.unsigned_abs()),
                std::cmp::Ordering::Greater => format!("$+{target}+0"),
                std::cmp::Ordering::Equal => "$+0".to_string(),
            }
        }
        Operand::EffectiveAddress(info) => {
            let prefix = if width_prefix {
                if info.wide { "word " } else { "byte " }
            } else {
                ""
            };
            format!("{prefix}[{}]", ea_body(info))
        }
    }
}

/// Whether this instruction's operand pair needs a `byte `/`word ` prefix:
/// exactly when one side is a memory operand and the other an immediate,
/// since neither side alone fixes the access width for the reader.
fn needs_width_prefix(inst: &Instruction) -> bool {
    matches!(
        (&inst.dst, &inst.src),
        (Operand::EffectiveAddress(_), Operand::Immediate(_)) | (Operand::Immediate(_), Operand::EffectiveAddress(_))
    )
}

/// The mnemonic-plus-operands portion shared by both decode-only and
/// execute-mode trace lines, e.g. `mov ax, bx` or `word [bx+si], 5`.
pub fn mnemonic_line(inst: &Instruction) -> String {
    let mnemonic = inst.itype.mnemonic();
    let prefix = needs_width_prefix(inst);
    if matches!(inst.dst, Operand::None) {
        return mnemonic.to_string();
    }
    let dst = format_operand(&inst.dst, prefix);
    if inst.has_src() {
        let src = format_operand(&inst.src, prefix);
        format!("{mnemonic} {dst}, {src}")
    } else {
        format!("{mnemonic} {dst}")
    }
}

/// The consumed bytes as space-separated 8-digit binary groups.
pub fn byte_stack_binary(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:08b}")).collect::<Vec<_>>().join(" ")
}

pub fn decorate(text: &str, color: &str, on: bool) -> String {
    if on {
        format!("{color}{text}{ANSI_RESET}")
    } else {
        text.to_string()
    }
}

pub fn mnemonic_color(text: &str, on: bool) -> String {
    decorate(text, ANSI_MNEMONIC, on)
}

pub fn error_color(text: &str, on: bool) -> String {
    decorate(text, ANSI_ERROR, on)
}

/// Name a destination operand for the execute-mode trace's `name:old->new`
/// segment; falls back to the bracketed address expression for memory.
pub fn dst_name(op: &Operand) -> String {
    match op {
        Operand::Register(reg, usage) => reg_name(*reg, *usage).to_string(),
        Operand::EffectiveAddress(info) => format!("[{}]", ea_body(info)),
        other => format_operand(other, false),
    }
}

/// A small `Display`-able summary of one instruction's execution effects:
/// the destination's before/after value, the IP's before/after value, and
/// the flags word's before/after letter strings.
pub struct ExecutionTrace {
    pub dst_name: String,
    pub dst_before: u16,
    pub dst_after: u16,
    pub ip_before: u16,
    pub ip_after: u16,
    pub flags_before: String,
    pub flags_after: String,
}

impl std::fmt::Display for ExecutionTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}->{} ip:{}->{} flags:{}->{}",
            self.dst_name, self.dst_before, self.dst_after, self.ip_before, self.ip_after, self.flags_before, self.flags_after
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::{Immediate, InstructionType};

    #[test]
    fn mov_reg_reg_renders_plainly() {
        let inst = Instruction::new(
            InstructionType::Mov,
            Operand::Register(Reg::A, RegUsage::Word),
            Operand::Register(Reg::B, RegUsage::Word),
        );
        assert_eq!(mnemonic_line(&inst), "mov ax, bx");
    }

    #[test]
    fn mem_immediate_gets_width_prefix() {
        let inst = Instruction::new(
            InstructionType::Mov,
            Operand::EffectiveAddress(EaInfo { base: EaBase::Direct, disp: Immediate::Word(0x0539), wide: true }),
            Operand::Immediate(Immediate::Word(0x1234)),
        );
        assert_eq!(mnemonic_line(&inst), "mov word [1337], 4660");
    }

    #[test]
    fn jump_renders_assembler_convention_target() {
        let inst = Instruction::new(InstructionType::Jne, Operand::Jump(-4), Operand::None);
        assert_eq!(mnemonic_line(&inst), "jne $-2+0");
    }

    #[test]
    fn jump_target_at_itself_is_dollar_minus_two() {
        // scenario 5: `jne $-2+0` is the encoding of a two-byte branch back
        // onto its own first byte (disp -2, +2 for the instruction length).
        let inst = Instruction::new(InstructionType::Jne, Operand::Jump(-2), Operand::None);
        assert_eq!(mnemonic_line(&inst), "jne $+0");
    }

    #[test]
    fn ea_with_negative_disp_uses_minus_sign() {
        let info = EaInfo { base: EaBase::Bx, disp: Immediate::Byte(-1), wide: true };
        assert_eq!(ea_body(&info), "bx-1");
    }
}
