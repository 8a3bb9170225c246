//! The simulator's single bundle of mutable state: registers, memory, and
//! the running clock counter. Passed by exclusive reference to the
//! executor and driver; nothing here is process-wide global state.

use crate::cpu::registers::{flags_to_letters, RegisterFile};
use crate::memory::Memory;

pub struct SimulatorState {
    pub regs: RegisterFile,
    pub mem: Memory,
    pub clock: u64,
}

impl SimulatorState {
    pub fn new() -> Self {
        Self {
            regs: RegisterFile::new(),
            mem: Memory::new(),
            clock: 0,
        }
    }

    /// Zeroes the register file, memory, and clock counter; re-running on
    /// a new input must fully reset all of them.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.reset();
        self.clock = 0;
    }

    /// Every nonzero register by full name, plus the final flags letters.
    pub fn register_dump(&self) -> Vec<(&'static str, u16)> {
        self.regs.nonzero_dump()
    }

    pub fn flags_letters(&self) -> String {
        flags_to_letters(self.regs.flags())
    }
}

impl Default for SimulatorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::registers::Reg;

    #[test]
    fn reset_clears_registers_memory_and_clock() {
        let mut state = SimulatorState::new();
        state.regs.set_word(Reg::A, 5);
        state.mem.write_u8(10, 0xFF).unwrap();
        state.clock = 42;
        state.reset();
        assert_eq!(state.regs.word(Reg::A), 0);
        assert_eq!(state.mem.read_u8(10).unwrap(), 0);
        assert_eq!(state.clock, 0);
    }

    #[test]
    fn register_dump_skips_zero_registers() {
        let mut state = SimulatorState::new();
        state.regs.set_word(Reg::A, 5);
        let dump = state.register_dump();
        assert_eq!(dump, vec![("ax", 5)]);
    }
}
