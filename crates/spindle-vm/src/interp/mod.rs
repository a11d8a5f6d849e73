//! The word dispatcher: execute/compile duality over a stream of words.
//!
//! Tokens come from a [`WordSource`] one line at a time. In execute mode a
//! known word runs immediately; in compile mode it is appended to the word
//! under definition as bytecode. Immediate words run during compilation,
//! which is how `;` manages to close a definition from inside one.

mod bootstrap;
mod dispatch;
mod source;

#[cfg(test)]
mod dispatch_tests;

pub use dispatch::Interpreter;
pub use source::{ScriptSource, WordSource};
