//! Word sources: where the dispatcher's tokens come from.

use std::collections::VecDeque;

/// Supplies whitespace-delimited words, one line of input at a time.
///
/// The empty string is the end-of-line sentinel: it tells the read loop
/// that the current line is exhausted and to come back at the next prompt.
/// Every refilled line is followed by one sentinel.
pub trait WordSource {
    /// Pull the next word. When nothing at all is buffered, one line is
    /// refilled from the underlying reader first (showing `prompt` where
    /// that makes sense). Returns the sentinel once the line runs out.
    fn next_word(&mut self, prompt: &str) -> String;

    /// True when no words remain buffered for the current line.
    fn is_drained(&self) -> bool;

    /// Throw away the rest of the current line. Error recovery: a bad word
    /// poisons everything after it on the same line.
    fn discard_line(&mut self);

    /// True once the underlying reader has nothing more to give.
    fn at_eof(&self) -> bool;
}

/// A fixed script of lines, fed out one word at a time.
///
/// Backs tests, script files, and one-shot evaluation. `at_eof` turns true
/// once every line has been handed out.
#[derive(Debug, Default)]
pub struct ScriptSource {
    lines: VecDeque<String>,
    buffer: VecDeque<String>,
}

impl ScriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// One source line per input line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            buffer: VecDeque::new(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        self.lines.push_back(line.to_string());
    }

    fn refill(&mut self) {
        if let Some(line) = self.lines.pop_front() {
            self.buffer
                .extend(line.split_whitespace().map(str::to_string));
            self.buffer.push_back(String::new());
        }
    }
}

impl WordSource for ScriptSource {
    fn next_word(&mut self, _prompt: &str) -> String {
        if self.buffer.is_empty() {
            self.refill();
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
        self.buffer.is_empty() && self.lines.is_empty()
    }
}
