//! Test harness for instruction-level testing.
//!
//! Bundles a [`SimulatorState`] with the small set of conveniences
//! `#[cfg(test)]` unit tests and `tests/*.rs` integration tests want: load a
//! byte program, single-step or multi-step it, read it back out, reset it.

use crate::cpu::cursor::ByteCursor;
use crate::cpu::state::SimulatorState;
use crate::cpu::step::StepOutcome;
use crate::error::SimError;

/// A self-contained simulator instance for tests. Two `SimHarness::new()`
/// values never share state; everything lives in the owned
/// [`SimulatorState`].
pub struct SimHarness {
    pub state: SimulatorState,
    program: Vec<u8>,
}

impl SimHarness {
    pub fn new() -> Self {
        Self {
            state: SimulatorState::new(),
            program: Vec::new(),
        }
    }

    /// Loads `code` at address 0 and resets IP to 0. There is no
    /// segmentation in this data model, so unlike a real loader there is
    /// no separate segment argument to place it at.
    pub fn load_program(&mut self, code: &[u8]) {
        self.program = code.to_vec();
        self.state.mem.load(&self.program, 0);
        self.state.regs.set_ip(0);
    }

    /// Executes exactly one instruction at the current IP, against the
    /// loaded program bytes. Panics if IP runs past the loaded program,
    /// which only happens if a test walks off the end of its own fixture.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        let ip = self.state.regs.ip() as usize;
        let mut cursor = ByteCursor::new(&self.program[ip..]);
        crate::cpu::step::step(&mut cursor, &mut self.state, true)
    }

    pub fn step_n(&mut self, n: usize) -> Result<(), SimError> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Zeroes registers, memory, and the clock, and rewinds IP to 0
    /// without forgetting the loaded program bytes.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

impl Default for SimHarness {
    fn default() -> Self {
        Self::new()
    }
}
