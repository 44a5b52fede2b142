use std::collections::VecDeque;

use tracing::{debug, info};

use crate::{
    config::SessionConfig,
    eval::Interpreter,
    history::HistoryStore,
    indent::next_line_indent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// the submitted line, prompt included
    Echo,
    Value,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: OutputKind,
    pub text: String,
}

impl OutputLine {
    fn new(kind: OutputKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// one console session: the input line, its history, the interpreter and
/// everything printed so far
pub struct Session {
    config: SessionConfig,
    history: HistoryStore,
    interpreter: Interpreter,
    input: String,
    output: VecDeque<OutputLine>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        info!(prompt = %config.prompt, "console session started");
        Self {
            config,
            history: HistoryStore::new(),
            interpreter: Interpreter::new(),
            input: String::new(),
            output: VecDeque::new(),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
        self.history.update(&self.input);
    }

    pub fn insert_str(&mut self, text: &str) {
        self.input.push_str(text);
        self.history.update(&self.input);
    }

    pub fn backspace(&mut self) {
        if self.input.pop().is_some() {
            self.history.update(&self.input);
        }
    }

    /// replace the input line with the previous history entry
    pub fn history_prev(&mut self) -> bool {
        if !self.history.prev() {
            return false;
        }
        self.input = self.history.get().to_string();
        true
    }

    pub fn history_next(&mut self) -> bool {
        if !self.history.next() {
            return false;
        }
        self.input = self.history.get().to_string();
        true
    }

    /// Tab: indent a blank line like the last executed one, otherwise insert
    /// one indent level
    pub fn indent(&mut self) {
        if self.input.trim().is_empty() {
            self.input = next_line_indent(self.history.transcript(), self.config.indent_width);
        } else {
            self.input.push_str(&" ".repeat(self.config.indent_width));
        }
        self.history.update(&self.input);
    }

    /// commit and execute the input line, returning what it printed
    pub fn submit(&mut self) -> Vec<OutputLine> {
        let line = std::mem::take(&mut self.input);
        self.history.update(&line);
        self.history.commit();

        let mut produced = vec![OutputLine::new(
            OutputKind::Echo,
            format!("{}{}", self.config.prompt, line),
        )];

        let trimmed = line.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            self.run_command(command, &mut produced);
        } else {
            match self.interpreter.execute(&line) {
                Ok(Some(value)) => produced.push(OutputLine::new(OutputKind::Value, value)),
                Ok(None) => {}
                Err(e) => {
                    debug!(error = %e, line = %line, "line failed");
                    produced.push(OutputLine::new(OutputKind::Error, format!("error: {e}")));
                }
            }
        }

        for out in &produced {
            self.push_output(out.clone());
        }
        produced
    }

    fn run_command(&self, command: &str, produced: &mut Vec<OutputLine>) {
        match command {
            "vars" => {
                let vars = self.interpreter.vars();
                produced.extend(vars.map(|(name, value)| {
                    OutputLine::new(OutputKind::Info, format!("{name} = {value}"))
                }));
            }
            "history" => {
                let entries = self.history.committed().iter().enumerate();
                produced.extend(entries.map(|(idx, entry)| {
                    OutputLine::new(OutputKind::Info, format!("{:4}  {}", idx + 1, entry))
                }));
            }
            "transcript" => {
                let transcript = self.history.transcript();
                produced.push(OutputLine::new(
                    OutputKind::Info,
                    format!("{} lines, {} bytes", transcript.line_count(), transcript.len()),
                ));
            }
            other => {
                produced.push(OutputLine::new(
                    OutputKind::Error,
                    format!("error: unknown command ':{other}'"),
                ));
            }
        }
    }

    fn push_output(&mut self, line: OutputLine) {
        self.output.push_back(line);
        while self.output.len() > self.config.max_output_lines {
            self.output.pop_front();
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn output(&self) -> impl Iterator<Item = &OutputLine> + '_ {
        self.output.iter()
    }

    pub fn output_len(&self) -> usize {
        self.output.len()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}
