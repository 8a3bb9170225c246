//! Clock model: per-shape cycle breakdowns, summed from typed parts so an
//! unmodeled shape is visible as `Unknown` rather than silently costed 0.

use crate::cpu::decode::effective_address::{self, EaShape};
use crate::cpu::decode::{InstructionType, Operand};

/// One term of a clock calculation. `Unknown` contributes zero cycles but
/// marks the total as uncertain; every other variant is a concrete cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPart {
    Instruction(u32),
    /// An effective-address cost: its shape, plus whether it resolved
    /// through one of the two fast base+index pairs (`bp+di`, `bx+si`),
    /// which shave a cycle off the base+index tiers only.
    EffectiveAddress(EaShape, bool),
    Range(u32, u32),
    AorB(u32, u32),
    SegmentOverride,
    WordTransfer(u32),
    Unknown,
}

impl ClockPart {
    fn cycles(self) -> u32 {
        match self {
            ClockPart::Instruction(base) => base,
            ClockPart::EffectiveAddress(shape, fast_pair) => ea_cycles(shape, fast_pair),
            ClockPart::Range(a, _) => a,
            ClockPart::AorB(a, _) => a,
            ClockPart::SegmentOverride => 2,
            ClockPart::WordTransfer(count) => count * 4,
            ClockPart::Unknown => 0,
        }
    }
}

/// An instruction's full cycle breakdown: the summed parts, plus whether
/// any part was `Unknown` (so callers can flag the total as a lower bound).
#[derive(Debug, Clone)]
pub struct ClockCalculation {
    pub parts: Vec<ClockPart>,
}

impl ClockCalculation {
    pub fn new(parts: Vec<ClockPart>) -> Self {
        Self { parts }
    }

    pub fn total(&self) -> u32 {
        self.parts.iter().map(|p| p.cycles()).sum()
    }

    pub fn is_exact(&self) -> bool {
        !self.parts.iter().any(|p| matches!(p, ClockPart::Unknown))
    }
}

/// EA shape cost. `bp+di`/`bx+si` shave one cycle off the two base+index
/// tiers (8→7, 12→11); every other shape is unaffected by `fast_pair`.
fn ea_cycles(shape: EaShape, fast_pair: bool) -> u32 {
    match shape {
        EaShape::DispOnly => 6,
        EaShape::BaseOrIndexOnly => 5,
        EaShape::BaseOrIndexWithDisp => 9,
        EaShape::BasePlusIndex => {
            if fast_pair {
                7
            } else {
                8
            }
        }
        EaShape::BasePlusIndexWithDisp => {
            if fast_pair {
                11
            } else {
                12
            }
        }
    }
}

fn ea_part(info: &crate::cpu::decode::EaInfo) -> ClockPart {
    let has_disp = info.disp.sign_extended() != 0;
    let shape = effective_address::shape_of(info.base, has_disp);
    let fast_pair = effective_address::is_fast_pair(info.base);
    ClockPart::EffectiveAddress(shape, fast_pair)
}

fn word_transfer_part(operand: &Operand, count: u32) -> Option<ClockPart> {
    match operand {
        Operand::EffectiveAddress(info) if info.wide => Some(ClockPart::WordTransfer(count)),
        _ => None,
    }
}

/// Builds the clock calculation for one decoded instruction's operand
/// shape. Shapes the component design doesn't name contribute a lone
/// `Unknown` part.
pub fn calculate(itype: InstructionType, dst: &Operand, src: &Operand) -> ClockCalculation {
    use InstructionType::*;
    use Operand::*;

    let mem_part = |op: &Operand| match op {
        EffectiveAddress(info) => Some(ea_part(info)),
        _ => None,
    };

    let parts = match (itype, dst, src) {
        (Mov, Register(..), Register(..)) => vec![ClockPart::Instruction(2)],
        (Mov, Register(..), EffectiveAddress(info)) => {
            let mut parts = vec![ClockPart::Instruction(8), ea_part(info)];
            if info.wide {
                parts.push(ClockPart::WordTransfer(1));
            }
            parts
        }
        (Mov, EffectiveAddress(info), Register(..)) => {
            let mut parts = vec![ClockPart::Instruction(9), ea_part(info)];
            if info.wide {
                parts.push(ClockPart::WordTransfer(1));
            }
            parts
        }
        (Add, Register(..), Register(..)) => vec![ClockPart::Instruction(3)],
        (Add, Register(..), EffectiveAddress(info)) => {
            let mut parts = vec![ClockPart::Instruction(9), ea_part(info)];
            if info.wide {
                parts.push(ClockPart::WordTransfer(1));
            }
            parts
        }
        (Add, EffectiveAddress(info), Register(..)) => {
            let mut parts = vec![ClockPart::Instruction(16), ea_part(info)];
            if info.wide {
                parts.push(ClockPart::WordTransfer(2));
            }
            parts
        }
        (Add, Register(..), Immediate(_)) => vec![ClockPart::Instruction(4)],
        (Add, EffectiveAddress(info), Immediate(_)) => {
            let mut parts = vec![ClockPart::Instruction(17), ea_part(info)];
            if info.wide {
                parts.push(ClockPart::WordTransfer(2));
            }
            parts
        }
        _ => {
            let mut parts = vec![ClockPart::Unknown];
            if let Some(p) = mem_part(dst) {
                parts.push(p);
            }
            if let Some(p) = mem_part(src) {
                parts.push(p);
            }
            if let Some(p) = word_transfer_part(dst, 1).or_else(|| word_transfer_part(src, 1)) {
                parts.push(p);
            }
            parts
        }
    };

    ClockCalculation::new(parts)
}
