//! A named callable: bytecode-backed or native.

use serde::{Deserialize, Serialize};

use crate::builtin::Builtin;
use crate::opcode::{Cell, Opcode};

/// A registered word.
///
/// A function is either bytecode-backed (non-empty `body`) or native (empty
/// body, a bound [`Builtin`]). The body is append-only while the word is
/// being compiled and never changes afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Function {
    name: String,
    body: Vec<Cell>,
    native: Option<Builtin>,
    immediate: bool,
}

impl Function {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            body: Vec::new(),
            native: None,
            immediate: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    /// Read one cell of the body.
    #[inline]
    pub fn cell(&self, idx: usize) -> Option<Cell> {
        self.body.get(idx).copied()
    }

    /// The bound capability, if this word is native.
    pub fn native(&self) -> Option<Builtin> {
        self.native
    }

    pub fn is_native(&self) -> bool {
        self.native.is_some()
    }

    /// Immediate words run during compile mode instead of being compiled in.
    pub fn immediate(&self) -> bool {
        self.immediate
    }

    /// Append one raw cell. The body is just cells; `emit`/`emit_with` are
    /// the well-formed way to grow it.
    pub fn push_cell(&mut self, cell: Cell) {
        self.body.push(cell);
    }

    /// Append a zero-operand instruction.
    pub fn emit(&mut self, op: Opcode) {
        self.push_cell(op.to_word());
    }

    /// Append an instruction and its operand cell.
    pub fn emit_with(&mut self, op: Opcode, operand: Cell) {
        self.push_cell(op.to_word());
        self.push_cell(operand);
    }

    pub(crate) fn bind(&mut self, builtin: Builtin, immediate: bool) {
        self.native = Some(builtin);
        self.immediate = immediate;
    }
}
