//! Stack VM and word dispatcher for the Spindle language.
//!
//! The VM steps through compiled word bodies one cell at a time; the
//! dispatcher turns whitespace-delimited words into immediate execution or
//! compiled bytecode, depending on its mode. The two cooperate by sharing
//! VM state: a word call only switches the active frame, and the outer
//! fetch loop does the stepping.

pub mod engine;
pub mod interp;

#[cfg(test)]
mod test_util;

// Re-export commonly used items at crate root
pub use engine::{Mode, RuntimeError, Vm};
pub use interp::{Interpreter, ScriptSource, WordSource};
