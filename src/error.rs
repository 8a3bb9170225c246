//! Structured error types for the decoder, executor, and driver.
//!
//! Hard failures (kinds that abort a run) are [`Error`] variants propagated
//! with `?`. Recoverable executor problems are [`ExecutionFault`] values
//! returned alongside a successfully-decoded instruction so the driver can
//! print an annotation and keep going.

use thiserror::Error;

/// Fatal errors that abort the current run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("unrecognized opcode {byte:#010b} at offset {offset}")]
    UnrecognizedOpcode { byte: u8, offset: usize },

    #[error("memory access out of range: address {address:#x}")]
    OutOfRangeMemory { address: u32 },

    #[error("cursor exhausted at offset {offset}: {needed} more byte(s) needed")]
    CursorExhausted { offset: usize, needed: usize },
}

/// Recoverable problems reported by the executor. The driver prints an
/// annotation line and continues decoding; IP still advances by the bytes
/// already consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionFault {
    /// The executor received an operand pair it cannot act on (e.g.
    /// memory destination with a memory source).
    InvalidOperandShape {
        mnemonic: &'static str,
        dst_kind: &'static str,
        src_kind: &'static str,
    },
    /// A semantic this executor does not model (e.g. an unrecognized
    /// branch predicate, reached only if a new mnemonic is decoded without
    /// a matching executor arm).
    UnimplementedSemantic { mnemonic: &'static str },
    /// `div`/`idiv` with a zero divisor.
    DivideByZero { mnemonic: &'static str },
}

impl std::fmt::Display for ExecutionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionFault::InvalidOperandShape { mnemonic, dst_kind, src_kind } => write!(
                f,
                "`{mnemonic}` is an invalid order of types: <{dst_kind}> <{src_kind}>"
            ),
            ExecutionFault::UnimplementedSemantic { mnemonic } => {
                write!(f, "{mnemonic} is unimplemented")
            }
            ExecutionFault::DivideByZero { mnemonic } => {
                write!(f, "{mnemonic}: divide by zero")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
