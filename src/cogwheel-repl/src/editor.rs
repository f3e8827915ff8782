//! The line-editing capability the dispatch loop reads from.
//!
//! The loop only needs three things from an editor: read a line against a
//! prompt, record history, and accept the current completion candidates.
//! [`RustylineEditor`] is the interactive implementation;
//! [`ScriptedEditor`] feeds a fixed signal sequence for tests and
//! non-interactive embedding.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use thiserror::Error;

/// What a read attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A complete input line (without the trailing newline).
    Line(String),
    /// The interrupt key was pressed.
    Interrupt,
    /// End of input.
    Eof,
}

/// A failure in the line-editing layer.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The underlying readline implementation failed.
    #[error("line editor failure")]
    Readline(#[from] ReadlineError),
}

/// The editing capability consumed by the dispatch loop.
pub trait LineEditor {
    /// Block until a line, an interrupt, or end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Signal, EditorError>;

    /// Record a line in the editing history.
    fn add_history(&mut self, line: &str);

    /// Replace the completion candidate set.
    ///
    /// The loop calls this before every read so candidates track the
    /// registry.
    fn set_candidates(&mut self, names: Vec<String>);
}

/// Completion state shared between the editor and its helper.
type Candidates = Arc<RwLock<Vec<String>>>;

struct ShellHelper {
    candidates: Candidates,
}

impl ShellHelper {
    fn pairs_from_prefix(names: &[String], prefix: &str) -> Vec<Pair> {
        names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }
}

impl rustyline::Helper for ShellHelper {}

impl rustyline::highlight::Highlighter for ShellHelper {}

impl rustyline::validate::Validator for ShellHelper {}

impl rustyline::hint::Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Complete the word under the cursor against the registered names.
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];

        let candidates = self.candidates.read().expect("completion lock poisoned");
        Ok((start, Self::pairs_from_prefix(&candidates, word)))
    }
}

/// Interactive line editor backed by rustyline.
///
/// History navigation, reverse search, kill/yank editing, and
/// clear-screen come from rustyline's stock Emacs bindings; tab
/// completion goes through the candidate set installed with
/// [`LineEditor::set_candidates`].
pub struct RustylineEditor {
    editor: Editor<ShellHelper, DefaultHistory>,
    candidates: Candidates,
}

impl RustylineEditor {
    /// Create an editor on the current terminal.
    pub fn new() -> Result<Self, EditorError> {
        let candidates: Candidates = Arc::new(RwLock::new(Vec::new()));
        let mut editor = Editor::new()?;
        editor.set_helper(Some(ShellHelper {
            candidates: candidates.clone(),
        }));

        Ok(Self { editor, candidates })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Signal, EditorError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Signal::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Signal::Interrupt),
            Err(ReadlineError::Eof) => Ok(Signal::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_candidates(&mut self, names: Vec<String>) {
        *self.candidates.write().expect("completion lock poisoned") = names;
    }
}

/// A line editor fed from a fixed signal sequence.
///
/// Useful for tests and for embedding the loop without a terminal: once
/// the sequence is exhausted, every read reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    signals: VecDeque<Signal>,
    history: Vec<String>,
    candidates: Vec<String>,
}

impl ScriptedEditor {
    /// Build from an explicit signal sequence.
    pub fn new(signals: impl IntoIterator<Item = Signal>) -> Self {
        Self {
            signals: signals.into_iter().collect(),
            history: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Build from plain input lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| Signal::Line(l.into())))
    }

    /// Lines recorded in history so far.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The completion candidates most recently installed.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<Signal, EditorError> {
        Ok(self.signals.pop_front().unwrap_or(Signal::Eof))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn set_candidates(&mut self, names: Vec<String>) {
        self.candidates = names;
    }
}
