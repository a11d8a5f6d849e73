//! Insertion-ordered word registry.

use serde::{Deserialize, Serialize};

use crate::builtin::Builtin;
use crate::function::Function;
use crate::opcode::Cell;

/// Identifier of a registered function: its insertion index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncId(u32);

impl FuncId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Encode as a `Call` operand cell.
    pub fn to_cell(self) -> Cell {
        Cell::from(self.0)
    }

    /// Decode from a `Call` operand cell. Operands are only ever written by
    /// the compiler from live ids, so the value is trusted.
    pub fn from_cell(cell: Cell) -> Self {
        Self(cell as u32)
    }
}

/// The process-lifetime registry of words.
///
/// Functions are appended at registration and never removed. Names are not
/// unique: lookup returns the first match in insertion order, so a later
/// definition with the same name is unreachable by name but keeps a valid
/// id. Linear scan is fine at this scale; any index added later must keep
/// first-registered-wins semantics.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FunctionTable {
    items: Vec<Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new word with an empty body. Uniqueness is the caller's
    /// responsibility.
    pub fn register(&mut self, name: &str) -> FuncId {
        self.items.push(Function::new(name));
        FuncId::new((self.items.len() - 1) as u32)
    }

    /// First match in insertion order, or `None`.
    pub fn lookup(&self, name: &str) -> Option<FuncId> {
        self.items
            .iter()
            .position(|f| f.name() == name)
            .map(|i| FuncId::new(i as u32))
    }

    /// Ids are valid by construction; callers never fabricate them.
    pub fn get(&self, id: FuncId) -> &Function {
        &self.items[id.index()]
    }

    pub fn get_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.items[id.index()]
    }

    /// Attach a native capability to a word whose body is (and stays) empty.
    pub fn bind_native(&mut self, id: FuncId, builtin: Builtin, immediate: bool) {
        self.items[id.index()].bind(builtin, immediate);
    }

    /// Register-and-bind in one step; the word is not immediate.
    pub fn register_native(&mut self, name: &str, builtin: Builtin) -> FuncId {
        let id = self.register(name);
        self.bind_native(id, builtin, false);
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
