//! Instruction encoding for compiled word bodies.
//!
//! A body is a flat sequence of cells: an opcode cell, then zero or one
//! operand cells depending on the opcode's fixed arity.

use serde::{Deserialize, Serialize};

/// The single machine word: data-stack values, opcodes, and operands all
/// share this width.
pub type Cell = i64;

/// Instruction opcodes for the Spindle VM.
///
/// The set is closed: any cell outside it fetched in opcode position is an
/// invalid-opcode condition, never a silent no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    /// Call the function whose id is in the next cell.
    Call,
    /// Adjust the program counter by the offset in the next cell. The
    /// offset is relative to the index of the Jump opcode itself.
    Jump,
    /// Hand control to the dispatcher's read loop until the current line's
    /// buffered words are consumed.
    Prompt,
    /// Push the literal in the next cell onto the data stack.
    PushNum,
    /// Consume exactly one word from the word source and dispatch it.
    Read,
    /// Pop the top call frame and resume the caller.
    Return,
}

impl Opcode {
    /// Decode from an instruction cell.
    pub fn from_word(w: Cell) -> Option<Self> {
        match w {
            0 => Some(Self::Call),
            1 => Some(Self::Jump),
            2 => Some(Self::Prompt),
            3 => Some(Self::PushNum),
            4 => Some(Self::Read),
            5 => Some(Self::Return),
            _ => None,
        }
    }

    /// Encode to an instruction cell.
    pub fn to_word(self) -> Cell {
        self as Cell
    }

    /// Number of operand cells following the opcode. Fixed per opcode,
    /// never data-dependent.
    pub fn operand_count(self) -> usize {
        match self {
            Self::Call | Self::Jump | Self::PushNum => 1,
            Self::Prompt | Self::Read | Self::Return => 0,
        }
    }
}
