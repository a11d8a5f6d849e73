//! Runtime errors for VM execution.

use spindle_bytecode::Cell;
use thiserror::Error;

/// Runtime error during VM execution.
///
/// Only some variants end the run; the interpreter reports the rest as
/// single-line diagnostics and keeps the prompt loop alive. See
/// [`RuntimeError::is_fatal`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A word needed more values than the data stack holds. The stack is
    /// left untouched.
    #[error("stack underflow in `{word}`")]
    StackUnderflow { word: &'static str },

    /// Division with a zero on top of the stack. Operands are left in place.
    #[error("division by zero")]
    DivisionByZero,

    /// A cell outside the closed opcode set turned up in opcode position.
    /// Recovery aborts the current frame rather than fetching past it.
    #[error("invalid opcode {value} in `{function}` at {position}")]
    InvalidOpcode {
        value: Cell,
        function: String,
        position: isize,
    },

    /// `Return` with no caller frame: malformed bytecode.
    #[error("return with no caller frame")]
    ReturnStackUnderflow,

    /// The program counter ran off the end of a word body.
    #[error("fetch past the end of `{function}` at {position}")]
    FetchOutOfBounds { function: String, position: isize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Fatal errors end the run; the rest are reported and execution
    /// continues at the next prompt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ReturnStackUnderflow | Self::FetchOutOfBounds { .. } | Self::Io(_)
        )
    }
}
