//! Token dispatch and the outer fetch loop.

use spindle_bytecode::{Builtin, Cell, FuncId, Opcode};

use crate::engine::{Mode, RuntimeError, Vm};

use super::bootstrap;
use super::source::WordSource;

const PROMPT: &str = "> ";
const CONTINUE_PROMPT: &str = "...> ";

/// The interpreter: a VM, a word source, and at most one word under
/// definition.
///
/// `run` is the outer fetch loop; the `Prompt` opcode hands control to the
/// read loop, which dispatches words and may switch the active frame out
/// from under the fetch loop. Calling a compiled word from the prompt only
/// changes `current`/`pc`; the fetch loop does the stepping once the read
/// loop yields.
pub struct Interpreter<S> {
    vm: Vm,
    source: S,
    def: Option<FuncId>,
}

impl<S: WordSource> Interpreter<S> {
    /// A fresh VM with the builtin words wired in, reading from `source`.
    pub fn new(source: S) -> Self {
        Self::with_vm(Vm::new(), source)
    }

    /// Same, but on a caller-supplied VM (custom output sink, prepared
    /// table). Bootstrap still runs; the driver becomes the active word.
    pub fn with_vm(mut vm: Vm, source: S) -> Self {
        let driver = bootstrap::install(vm.table_mut());
        vm.start_at(driver);
        Self {
            vm,
            source,
            def: None,
        }
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut self.vm
    }

    /// The outer fetch loop. Runs until `exit` clears the running flag or
    /// the word source dries up; fatal errors end the run, everything else
    /// is reported and the rest of the offending line dropped.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while self.vm.running() {
            if let Err(err) = self.step() {
                if err.is_fatal() {
                    return Err(err);
                }
                self.vm.diagnostic(&err.to_string())?;
                self.source.discard_line();
            }
        }
        Ok(())
    }

    /// Fetch and execute one instruction of the current word.
    fn step(&mut self) -> Result<(), RuntimeError> {
        let cell = self.vm.fetch_next()?;
        match Opcode::from_word(cell) {
            Some(Opcode::Call) => {
                let id = FuncId::from_cell(self.vm.fetch_next()?);
                self.call(id)?;
                Ok(())
            }
            Some(Opcode::Jump) => self.vm.jump(),
            Some(Opcode::Prompt) => self.prompt(),
            Some(Opcode::PushNum) => self.vm.push_literal(),
            Some(Opcode::Read) => self.read().map(|_| ()),
            Some(Opcode::Return) => self.vm.do_return(),
            None => {
                // Fetching past a malformed cell would fabricate reads, so
                // the frame is abandoned instead.
                let err = RuntimeError::InvalidOpcode {
                    value: cell,
                    function: self.vm.current_function().name().to_string(),
                    position: self.vm.pc(),
                };
                self.vm.diagnostic(&err.to_string())?;
                self.vm.abort_frame();
                Ok(())
            }
        }
    }

    /// `Prompt`: drain the current line through the dispatcher. An
    /// exhausted source would make the driver spin forever; stop instead.
    fn prompt(&mut self) -> Result<(), RuntimeError> {
        if self.source.at_eof() {
            self.vm.stop();
            return Ok(());
        }
        while self.read()? {}
        Ok(())
    }

    /// `Read`: consume exactly one word and dispatch it. Returns false once
    /// the current line is exhausted.
    fn read(&mut self) -> Result<bool, RuntimeError> {
        let word = self.source.next_word(self.prompt_str());
        if word.is_empty() {
            return Ok(false);
        }
        self.dispatch(&word)
    }

    fn prompt_str(&self) -> &'static str {
        match self.vm.mode() {
            Mode::Execute => PROMPT,
            Mode::Compile => CONTINUE_PROMPT,
        }
    }

    /// Resolve one word and act on it per the current mode. The returned
    /// bool tells the read loop whether to keep going: switching into a
    /// compiled word stops the loop so the fetch loop can step it.
    fn dispatch(&mut self, word: &str) -> Result<bool, RuntimeError> {
        if let Some(id) = self.vm.table().lookup(word) {
            return self.dispatch_known(id);
        }
        match word.parse::<Cell>() {
            Ok(value) => {
                self.literal(value)?;
                Ok(true)
            }
            Err(_) => {
                self.vm
                    .diagnostic(&format!("`{word}` is not a word or a number"))?;
                self.source.discard_line();
                Ok(false)
            }
        }
    }

    fn dispatch_known(&mut self, id: FuncId) -> Result<bool, RuntimeError> {
        let func = self.vm.table().get(id);
        if func.immediate() {
            if let Some(builtin) = func.native() {
                self.run_builtin(builtin)?;
            }
            return Ok(true);
        }
        match self.vm.mode() {
            Mode::Execute => self.call(id),
            Mode::Compile => {
                self.emit_into_def(Opcode::Call, id.to_cell())?;
                Ok(true)
            }
        }
    }

    /// Run a word now. A native runs in place, frames untouched; a
    /// bytecode-backed word only becomes the active frame.
    fn call(&mut self, id: FuncId) -> Result<bool, RuntimeError> {
        let func = self.vm.table().get(id);
        if !func.body().is_empty() {
            self.vm.enter(id);
            return Ok(false);
        }
        if let Some(builtin) = func.native() {
            self.run_builtin(builtin)?;
        }
        Ok(true)
    }

    /// The single dispatch point for native capabilities.
    fn run_builtin(&mut self, builtin: Builtin) -> Result<(), RuntimeError> {
        match builtin {
            Builtin::PrintTop => self.vm.print_top(),
            Builtin::PrintStack => self.vm.print_all(),
            Builtin::Arith(op) => self.vm.arith(op),
            Builtin::Stack(op) => self.vm.stack_op(op),
            Builtin::Exit => {
                self.vm.stop();
                Ok(())
            }
            Builtin::DefineBegin => self.begin_define(),
            Builtin::DefineEnd => {
                self.end_define();
                Ok(())
            }
        }
    }

    /// An integer literal: pushed in execute mode, compiled in compile mode.
    fn literal(&mut self, value: Cell) -> Result<(), RuntimeError> {
        match self.vm.mode() {
            Mode::Execute => {
                self.vm.push(value);
                Ok(())
            }
            Mode::Compile => self.emit_into_def(Opcode::PushNum, value),
        }
    }

    fn emit_into_def(&mut self, op: Opcode, operand: Cell) -> Result<(), RuntimeError> {
        let Some(def) = self.def else {
            self.vm.diagnostic("nothing is being defined")?;
            self.source.discard_line();
            return Ok(());
        };
        self.vm.table_mut().get_mut(def).emit_with(op, operand);
        Ok(())
    }

    /// `:`. Compile mode is entered before the name is read so continuation
    /// prompts already render as such. The name may arrive on a later line;
    /// words pulled while scanning for it are not dispatched.
    fn begin_define(&mut self) -> Result<(), RuntimeError> {
        self.vm.set_mode(Mode::Compile);

        let name = loop {
            let word = self.source.next_word(CONTINUE_PROMPT);
            if !word.is_empty() {
                break word;
            }
            if self.source.at_eof() {
                // Input ended before a name arrived; abandon the definition.
                self.end_define();
                return Ok(());
            }
        };

        if self.vm.table().lookup(&name).is_some() {
            self.end_define();
            self.vm
                .diagnostic(&format!("word `{name}` is already defined"))?;
            self.source.discard_line();
            return Ok(());
        }

        // Registered eagerly: the word exists from here on, but its body is
        // unterminated until `;` appends the Return.
        self.def = Some(self.vm.table_mut().register(&name));
        Ok(())
    }

    /// `;`, immediate: back to execute mode, terminating the word under
    /// definition if there is one.
    fn end_define(&mut self) {
        self.vm.set_mode(Mode::Execute);
        if let Some(def) = self.def.take() {
            self.vm.table_mut().get_mut(def).emit(Opcode::Return);
        }
    }
}
