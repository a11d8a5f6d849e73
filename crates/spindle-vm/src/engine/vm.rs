//! Virtual machine state and the instruction executor.

use std::io::{self, Write};

use spindle_bytecode::{ArithOp, Cell, FuncId, Function, FunctionTable, StackOp};

use super::error::RuntimeError;
use super::frame::{Frame, ReturnStack};
use super::stack::DataStack;

/// Dispatcher mode: run words now, or compile them into the word under
/// definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Execute,
    Compile,
}

/// Marker printed by `.` when the stack is empty.
const EMPTY_MARKER: &str = "<empty>";

/// The whole of the machine: word table, both stacks, fetch position, mode,
/// and the output sink the printing words write to.
///
/// One owned value, threaded explicitly; there is no ambient global.
pub struct Vm {
    table: FunctionTable,
    stack: DataStack,
    rstack: ReturnStack,
    current: FuncId,
    /// Index of the last-fetched cell in the current body; fetch advances
    /// before reading, so `-1` means "about to start".
    pc: isize,
    mode: Mode,
    running: bool,
    out: Box<dyn Write>,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// A VM whose printing words and diagnostics go to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            table: FunctionTable::new(),
            stack: DataStack::new(),
            rstack: ReturnStack::new(),
            current: FuncId::new(0),
            pc: -1,
            mode: Mode::Execute,
            running: true,
            out,
        }
    }

    pub fn table(&self) -> &FunctionTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut FunctionTable {
        &mut self.table
    }

    pub fn stack(&self) -> &DataStack {
        &self.stack
    }

    /// The function the fetch loop is currently stepping.
    pub fn current_function(&self) -> &Function {
        self.table.get(self.current)
    }

    pub fn pc(&self) -> isize {
        self.pc
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// `exit`: clear the running flag. Neither stack is unwound; the run
    /// loop notices at the next fetch boundary.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn call_depth(&self) -> usize {
        self.rstack.depth()
    }

    /// Make `id` the active function, with the counter at the start
    /// sentinel. Used once at startup for the driver.
    pub fn start_at(&mut self, id: FuncId) {
        self.current = id;
        self.pc = -1;
    }

    /// Advance the program counter and read the next cell of the current
    /// body. Running off the end is fatal.
    pub fn fetch_next(&mut self) -> Result<Cell, RuntimeError> {
        self.pc += 1;
        let func = self.table.get(self.current);
        func.cell(self.pc as usize)
            .ok_or_else(|| RuntimeError::FetchOutOfBounds {
                function: func.name().to_string(),
                position: self.pc,
            })
    }

    /// `Jump`: the operand is relative to the index of the Jump opcode
    /// itself, which sits one cell behind the operand just fetched.
    pub fn jump(&mut self) -> Result<(), RuntimeError> {
        let offset = self.fetch_next()?;
        self.pc += offset as isize - 1;
        Ok(())
    }

    /// `PushNum`: fetch the literal operand and push it.
    pub fn push_literal(&mut self) -> Result<(), RuntimeError> {
        let value = self.fetch_next()?;
        self.stack.push(value);
        Ok(())
    }

    /// Switch execution into a bytecode-backed word: save the caller frame
    /// and position the counter just before the first instruction. The
    /// outer fetch loop does the stepping from here.
    pub fn enter(&mut self, id: FuncId) {
        self.rstack.push(Frame {
            function: self.current,
            pc: self.pc,
        });
        self.current = id;
        self.pc = -1;
    }

    /// `Return`: pop the top frame and resume the caller.
    pub fn do_return(&mut self) -> Result<(), RuntimeError> {
        let frame = self
            .rstack
            .pop()
            .ok_or(RuntimeError::ReturnStackUnderflow)?;
        self.current = frame.function;
        self.pc = frame.pc;
        Ok(())
    }

    /// Recovery for a malformed body: fall back to the caller, or stop the
    /// VM when the malformed word had no caller to fall back to.
    pub fn abort_frame(&mut self) {
        if self.do_return().is_err() {
            self.running = false;
        }
    }

    pub fn push(&mut self, value: Cell) {
        self.stack.push(value);
    }

    /// Binary arithmetic. Arity and the divisor are checked before any pop,
    /// so a failed operation leaves the stack untouched.
    pub fn arith(&mut self, op: ArithOp) -> Result<(), RuntimeError> {
        let (lhs, rhs) = self
            .stack
            .top2()
            .ok_or(RuntimeError::StackUnderflow { word: op.symbol() })?;
        if op == ArithOp::Div && rhs == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        self.stack.drop_top(2);
        self.stack.push(op.apply(lhs, rhs));
        Ok(())
    }

    /// Stack-shuffling words, with the same untouched-on-error policy.
    pub fn stack_op(&mut self, op: StackOp) -> Result<(), RuntimeError> {
        let underflow = RuntimeError::StackUnderflow { word: op.symbol() };
        match op {
            StackOp::Dup => {
                let top = self.stack.top().ok_or(underflow)?;
                self.stack.push(top);
            }
            StackOp::Pop => {
                self.stack.pop().ok_or(underflow)?;
            }
            StackOp::Clear => self.stack.clear(),
            StackOp::Swap => {
                let (second, top) = self.stack.top2().ok_or(underflow)?;
                self.stack.drop_top(2);
                self.stack.push(top);
                self.stack.push(second);
            }
        }
        Ok(())
    }

    /// `.`: the top of the stack, or the empty marker. Never pops.
    pub fn print_top(&mut self) -> Result<(), RuntimeError> {
        match self.stack.top() {
            Some(value) => writeln!(self.out, "{value}")?,
            None => writeln!(self.out, "{EMPTY_MARKER}")?,
        }
        Ok(())
    }

    /// `..`: the whole stack, bottom to top. Never pops.
    pub fn print_all(&mut self) -> Result<(), RuntimeError> {
        write!(self.out, "[ ")?;
        for value in self.stack.as_slice() {
            write!(self.out, "{value} ")?;
        }
        writeln!(self.out, "]")?;
        Ok(())
    }

    /// Single-line user diagnostic on the same sink the printing words use.
    pub(crate) fn diagnostic(&mut self, msg: &str) -> Result<(), RuntimeError> {
        writeln!(self.out, "error: {msg}")?;
        Ok(())
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
