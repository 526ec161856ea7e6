//! A calculator session: stack, ledgers, formatter, and dispatch
//!
//! The engine itself is plain call/return code; this module owns the state
//! it operates on and interprets the events it hands back. One [`Session`]
//! corresponds to one running calculator: it holds the stack, both
//! ledgers, the display formatter, and the arrow selector, and routes
//! every key-bound [`Operation`] through the engine.

use std::collections::HashMap;

use crate::domain::Domain;
use crate::engine::{
    self, catalog, ArrowDirection, EngineError, EventKind, Operation, Outcome, RedoLedger, Stack,
    UndoLedger,
};
use crate::format::DisplayFormatter;

/// Something the dispatcher should do after a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// State changed (or an error was cleared); redraw.
    Updated,
    /// The user asked to leave.
    Quit,
    /// Leave the current submenu.
    Back,
    /// Switch the active keymap to the display menu.
    EnterDisplayMenu,
    /// The user wants a value copied up but the arrow is unset; prompt for
    /// a line label and call [`Session::copy_from_label`].
    PickFromStack,
}

/// Clipboard access as a capability port. The core never touches the OS;
/// the front end decides what "clipboard" means.
pub trait Clipboard {
    fn copy(&mut self, text: &str);
    fn paste(&mut self) -> Option<String>;
}

/// Process-local clipboard, also the test double.
#[derive(Debug, Default)]
pub struct InMemoryClipboard {
    contents: Option<String>,
}

impl Clipboard for InMemoryClipboard {
    fn copy(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }

    fn paste(&mut self) -> Option<String> {
        self.contents.clone()
    }
}

/// One running calculator.
pub struct Session {
    stack: Stack,
    undo_ledger: UndoLedger,
    redo_ledger: RedoLedger,
    formatter: DisplayFormatter,
    /// Offset from the top of the stack; 0 means the top itself.
    arrow: usize,
    clipboard: Box<dyn Clipboard>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DisplayFormatter::default())
    }
}

impl Session {
    pub fn new(formatter: DisplayFormatter) -> Self {
        Self::with_clipboard(formatter, Box::new(InMemoryClipboard::default()))
    }

    pub fn with_clipboard(formatter: DisplayFormatter, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            stack: Stack::new(),
            undo_ledger: UndoLedger::new(),
            redo_ledger: RedoLedger::new(),
            formatter,
            arrow: 0,
            clipboard,
        }
    }

    pub fn stack(&self) -> &[f64] {
        &self.stack
    }

    pub fn arrow(&self) -> usize {
        self.arrow
    }

    pub fn formatter(&self) -> &DisplayFormatter {
        &self.formatter
    }

    /// Runs one operation. Failures leave the session unchanged.
    pub fn execute(&mut self, operation: &Operation) -> Result<Reply, EngineError> {
        self.clamp_arrow();
        let outcome = engine::apply(operation, &mut self.stack, &mut self.undo_ledger, self.arrow)?;
        match outcome {
            Outcome::Mutated => {
                self.arrow = 0;
                // A fresh action invalidates the forward history.
                self.redo_ledger.clear();
                Ok(Reply::Updated)
            }
            Outcome::Event(event) => self.handle_event(event),
        }
    }

    /// Parses typed (or pasted) text and pushes it.
    pub fn enter_value(&mut self, text: &str) -> Result<Reply, EngineError> {
        let value = parse_value(text)?;
        let operation = Operation::push(value)?;
        self.execute(&operation)
    }

    /// Pushes the value addressed by a line label (`x`, `y`, `z`, `1`, ...).
    pub fn copy_from_label(&mut self, label: &str) -> Result<Reply, EngineError> {
        let offset = lookup_line_label(label)?;
        let value = self
            .stack
            .len()
            .checked_sub(offset + 1)
            .map(|index| self.stack[index])
            .ok_or_else(|| {
                EngineError::DomainViolation(format!("No stack value at '{label}'"))
            })?;
        let operation = Operation::push(value)?;
        self.execute(&operation)
    }

    fn handle_event(&mut self, event: EventKind) -> Result<Reply, EngineError> {
        match event {
            EventKind::Undo => {
                engine::undo(&mut self.stack, &mut self.undo_ledger, &mut self.redo_ledger)?;
                self.clamp_arrow();
                Ok(Reply::Updated)
            }
            EventKind::Redo => {
                engine::redo(&mut self.stack, &mut self.undo_ledger, &mut self.redo_ledger)?;
                self.arrow = 0;
                Ok(Reply::Updated)
            }
            EventKind::Quit => Ok(Reply::Quit),
            EventKind::Back => Ok(Reply::Back),
            EventKind::EnterDisplayMenu => Ok(Reply::EnterDisplayMenu),
            EventKind::Arrow(ArrowDirection::Up) => {
                self.arrow += 1;
                self.clamp_arrow();
                Ok(Reply::Updated)
            }
            EventKind::Arrow(ArrowDirection::Down) => {
                self.arrow = self.arrow.saturating_sub(1);
                Ok(Reply::Updated)
            }
            EventKind::CopyFromStack => {
                if self.arrow == 0 {
                    return Ok(Reply::PickFromStack);
                }
                let index = self.stack.len() - 1 - self.arrow;
                let operation = Operation::push(self.stack[index])?;
                self.execute(&operation)
            }
            EventKind::ClipboardCopy => {
                // The signal's arity check guarantees a value exists.
                let index = self
                    .stack
                    .len()
                    .checked_sub(self.arrow + 1)
                    .unwrap_or(self.stack.len() - 1);
                let text = self.stack[index].to_string();
                self.clipboard.copy(&text);
                self.arrow = 0;
                Ok(Reply::Updated)
            }
            EventKind::ClipboardPaste => {
                let text = self
                    .clipboard
                    .paste()
                    .ok_or_else(|| EngineError::MalformedEntry("empty clipboard".to_string()))?;
                self.enter_value(&text)
            }
            EventKind::Display(adjustment) => {
                self.formatter.adjust(adjustment);
                Ok(Reply::Updated)
            }
        }
    }

    /// The arrow must always point at a stack element; anything out of
    /// range resets to the top.
    fn clamp_arrow(&mut self) {
        if self.arrow >= self.stack.len() {
            self.arrow = 0;
        }
    }
}

/// Parses textual entry into a stack value. Spellings that parse but are
/// not finite ("inf", "NaN") are rejected through the domain algebra, the
/// same gate every other entry path uses.
pub fn parse_value(text: &str) -> Result<f64, EngineError> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| EngineError::MalformedEntry(trimmed.to_string()))?;
    if !Domain::all().contains(value) {
        return Err(EngineError::MalformedEntry(trimmed.to_string()));
    }
    Ok(value)
}

/// Label for the stack element `offset` positions from the top.
pub fn line_label(offset: usize) -> String {
    match offset {
        0 => "x".to_string(),
        1 => "y".to_string(),
        2 => "z".to_string(),
        deeper => (deeper - 2).to_string(),
    }
}

/// Inverse of [`line_label`]: offset from the top for a label.
pub fn lookup_line_label(label: &str) -> Result<usize, EngineError> {
    match label {
        "x" => Ok(0),
        "y" => Ok(1),
        "z" => Ok(2),
        number => {
            let n: usize = number
                .parse()
                .map_err(|_| EngineError::MalformedEntry(label.to_string()))?;
            if n < 1 {
                return Err(EngineError::MalformedEntry(label.to_string()));
            }
            Ok(n + 2)
        }
    }
}

/// Key-string to operation registry.
#[derive(Debug, Default)]
pub struct Keymap {
    entries: HashMap<String, Operation>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a binding. Rebinding a key is a configuration bug and is
    /// reported rather than silently overwritten.
    pub fn bind(&mut self, key: &str, operation: Operation) -> Result<(), EngineError> {
        if self.entries.contains_key(key) {
            return Err(EngineError::MalformedEntry(format!(
                "key '{key}' is already bound"
            )));
        }
        self.entries.insert(key.to_string(), operation);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Operation> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One help line per visible operation: its keys, sorted and comma
    /// separated, then the description. Lines come back sorted.
    pub fn help_lines(&self) -> Vec<String> {
        let mut groups: Vec<(&Operation, Vec<&str>)> = Vec::new();
        for (key, operation) in &self.entries {
            if !operation.visible() {
                continue;
            }
            match groups.iter_mut().find(|(existing, _)| *existing == operation) {
                Some((_, keys)) => keys.push(key),
                None => groups.push((operation, vec![key])),
            }
        }
        let mut lines: Vec<String> = groups
            .into_iter()
            .map(|(operation, mut keys)| {
                keys.sort_unstable();
                format!("{}: {}", keys.join(", "), operation.description())
            })
            .collect();
        lines.sort_unstable();
        lines
    }

    /// The stock key bindings for the main calculator view.
    pub fn default_bindings() -> Self {
        let mut keymap = Self::new();
        let mut bind = |key: &str, operation: Operation| {
            // Duplicates in the builtin table are caught by tests.
            let _ = keymap.bind(key, operation);
        };

        bind("x", Operation::delete());
        bind("z", catalog::switch2());
        bind("+", catalog::addition());
        bind("a", catalog::addition());
        bind("s", catalog::subtract());
        bind("-", catalog::subtract());
        bind("m", catalog::multiply());
        bind("*", catalog::multiply());
        bind("d", catalog::divide());
        bind("/", catalog::divide());
        bind("p", catalog::exponent());
        bind("q", catalog::square());
        bind("S", catalog::sqrt());
        bind("E", catalog::power_e());
        // On 'e' so "1e3"-style entry keeps working.
        bind("e", catalog::power_10());
        bind("L", catalog::log10());
        bind("l", catalog::ln());
        bind("I", catalog::mult_inverse());
        bind("i", catalog::add_inverse());
        bind("M", catalog::modulo());
        bind("%", catalog::modulo());
        bind("#", catalog::gcd());
        bind("!", catalog::factorial());
        bind("`", catalog::floor());
        bind("~", catalog::ceil());
        bind("meta e", catalog::euler());
        bind("meta p", catalog::pi());

        bind("meta t", catalog::tan());
        bind("meta s", catalog::sin());
        bind("meta c", catalog::cos());
        bind("meta T", catalog::arctan());
        bind("meta S", catalog::arcsin());
        bind("meta C", catalog::arccos());

        bind("t", catalog::copy_from_stack());
        bind(" ", Operation::copy_current().hidden());
        bind("enter", Operation::copy_current());
        bind("u", catalog::undo());
        bind("U", catalog::redo());
        bind("Q", catalog::quit());
        bind("c", catalog::clipboard_copy());
        bind("v", catalog::clipboard_paste());
        bind("f", catalog::display_menu());

        bind("up", catalog::arrow_up());
        bind("k", catalog::arrow_up());
        bind("down", catalog::arrow_down());
        bind("j", catalog::arrow_down());

        keymap
    }

    /// Bindings active inside the display submenu.
    pub fn display_bindings() -> Self {
        let mut keymap = Self::new();
        let mut bind = |key: &str, operation: Operation| {
            let _ = keymap.bind(key, operation);
        };

        bind("+", catalog::more_precision());
        bind("-", catalog::less_precision());
        bind("f", catalog::fixed_notation());
        bind("a", catalog::auto_notation());
        bind("s", catalog::scientific_notation());
        bind("n", catalog::engineering_notation());
        bind("b", catalog::back());
        bind("Q", catalog::quit());

        keymap
    }
}
