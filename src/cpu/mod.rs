//! The CPU core: byte cursor, decoder families, executor, register file,
//! and clock model for the simulated 16-bit processor.

pub mod cursor;
pub mod decode;
pub mod execute;
pub mod harness;
pub mod registers;
pub mod state;
pub mod step;
pub mod timing;

pub use cursor::ByteCursor;
pub use harness::SimHarness;
pub use state::SimulatorState;
pub use step::{step, StepOutcome};
