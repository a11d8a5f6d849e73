//! Interactive word source backed by rustyline.

use std::collections::VecDeque;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use spindle_vm::WordSource;

/// Reads lines from the terminal with editing and in-memory history.
/// Ctrl-C and Ctrl-D both surface as end of input, which the interpreter
/// turns into a clean stop.
pub struct ConsoleSource {
    editor: DefaultEditor,
    buffer: VecDeque<String>,
    eof: bool,
}

impl ConsoleSource {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            buffer: VecDeque::new(),
            eof: false,
        })
    }

    fn refill(&mut self, prompt: &str) {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                self.buffer
                    .extend(line.split_whitespace().map(str::to_string));
                self.buffer.push_back(String::new());
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => self.eof = true,
            Err(err) => {
                eprintln!("input error: {err}");
                self.eof = true;
            }
        }
    }
}

impl WordSource for ConsoleSource {
    fn next_word(&mut self, prompt: &str) -> String {
        if self.buffer.is_empty() && !self.eof {
            self.refill(prompt);
        }
        self.buffer.pop_front().unwrap_or_default()
    }

    fn is_drained(&self) -> bool {
        self.buffer.is_empty()
    }

    fn discard_line(&mut self) {
        self.buffer.clear();
    }

    fn at_eof(&self) -> bool {
        self.eof && self.buffer.is_empty()
    }
}
