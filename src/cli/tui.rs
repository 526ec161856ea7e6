//! Interactive terminal interface
//!
//! Renders the stack with its line labels and arrow marker, an entry line,
//! an error line, and a help sidebar generated from the key bindings.
//! All state lives in the [`Session`]; this module only decodes keys and
//! draws.

use std::io::{self, stdout, Stdout};
use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::session::{line_label, Keymap, Reply, Session};

/// Terminal type alias
type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

fn init_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = ratatui::Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Which set of key bindings is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Calculator,
    DisplayMenu,
    /// Waiting for a line label after a copy-from-stack request.
    PickFromStack,
}

struct App {
    session: Session,
    bindings: Keymap,
    display_bindings: Keymap,
    mode: Mode,
    /// Number being typed, if any.
    entry: Option<String>,
    error: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(session: Session) -> Self {
        Self {
            session,
            bindings: Keymap::default_bindings(),
            display_bindings: Keymap::display_bindings(),
            mode: Mode::default(),
            entry: None,
            error: None,
            should_quit: false,
        }
    }

    fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        loop {
            terminal.draw(|frame| draw(frame, self))?;
            if self.should_quit {
                return Ok(());
            }
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.mode == Mode::PickFromStack {
            self.mode = Mode::Calculator;
            if let KeyCode::Char(label) = key.code {
                let result = self.session.copy_from_label(&label.to_string());
                self.report(result);
            }
            return;
        }

        if self.entry.is_some() {
            self.handle_entry_key(key);
            return;
        }

        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                if c.is_ascii_digit() || c == '.' {
                    self.entry = Some(c.to_string());
                    return;
                }
                if c == '_' {
                    self.entry = Some("-".to_string());
                    return;
                }
            }
        }

        if let Some(name) = key_name(key) {
            self.dispatch(&name);
        }
    }

    /// Digits and exponent characters extend the buffer; Enter commits it;
    /// any bound key commits first and then runs, matching how entry flows
    /// into the next operation.
    fn handle_entry_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == 'e' => {
                if let Some(buffer) = &mut self.entry {
                    buffer.push(c);
                }
            }
            KeyCode::Char('_') => {
                if let Some(buffer) = &mut self.entry {
                    buffer.push('-');
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = &mut self.entry {
                    buffer.pop();
                    if buffer.is_empty() {
                        self.entry = None;
                    }
                }
            }
            KeyCode::Esc => self.entry = None,
            KeyCode::Enter => self.commit_entry(),
            _ => {
                self.commit_entry();
                if self.error.is_none() {
                    if let Some(name) = key_name(key) {
                        self.dispatch(&name);
                    }
                }
            }
        }
    }

    fn commit_entry(&mut self) {
        if let Some(buffer) = self.entry.take() {
            let result = self.session.enter_value(&buffer);
            self.report(result);
        }
    }

    fn dispatch(&mut self, name: &str) {
        let keymap = match self.mode {
            Mode::DisplayMenu => &self.display_bindings,
            _ => &self.bindings,
        };
        let Some(operation) = keymap.get(name).cloned() else {
            return;
        };
        let result = self.session.execute(&operation);
        self.report(result);
    }

    fn report(&mut self, result: Result<Reply, crate::engine::EngineError>) {
        match result {
            Ok(Reply::Updated) => self.error = None,
            Ok(Reply::Quit) => self.should_quit = true,
            Ok(Reply::Back) => {
                self.mode = Mode::Calculator;
                self.error = None;
            }
            Ok(Reply::EnterDisplayMenu) => {
                self.mode = Mode::DisplayMenu;
                self.error = None;
            }
            Ok(Reply::PickFromStack) => {
                self.mode = Mode::PickFromStack;
                self.error = None;
            }
            Err(error) => self.error = Some(error.to_string()),
        }
    }
}

/// Encodes a key press the way the keymap names it.
fn key_name(key: KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => Some(format!("meta {c}")),
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::Enter => Some("enter".to_string()),
        KeyCode::Up => Some("up".to_string()),
        KeyCode::Down => Some("down".to_string()),
        _ => None,
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let [label_area, stack_area, help_area] = Layout::horizontal([
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(24),
    ])
    .areas(frame.area());

    let [values_area, entry_area, error_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(stack_area);

    let height = values_area.height as usize;
    let (label_lines, value_lines) = stack_lines(app, height);
    frame.render_widget(Paragraph::new(label_lines), label_area);
    frame.render_widget(Paragraph::new(value_lines), values_area);

    let entry_text = match (&app.entry, app.mode) {
        (_, Mode::PickFromStack) => "copy from: ".to_string(),
        (Some(buffer), _) => format!("> {buffer}"),
        (None, _) => String::new(),
    };
    frame.render_widget(Paragraph::new(entry_text), entry_area);

    let error_text = app.error.clone().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(error_text).style(Style::default().fg(Color::Red)),
        error_area,
    );

    let (title, keymap) = match app.mode {
        Mode::DisplayMenu => ("display", &app.display_bindings),
        _ => ("keys", &app.bindings),
    };
    let mut help = vec![Line::styled(title, Style::default().bold())];
    help.extend(keymap.help_lines().into_iter().map(Line::from));
    frame.render_widget(Paragraph::new(help), help_area);
}

/// Bottom-aligned stack rows: labels (with the arrow marker) and values.
fn stack_lines(app: &App, height: usize) -> (Vec<Line<'static>>, Vec<Line<'static>>) {
    let stack = app.session.stack();
    let formatter = app.session.formatter();
    let shown = stack.len().min(height);

    let mut label_lines = Vec::with_capacity(height);
    let mut value_lines = Vec::with_capacity(height);
    for _ in shown..height {
        label_lines.push(Line::raw(""));
        value_lines.push(Line::raw(""));
    }
    for row in 0..shown {
        let offset = shown - 1 - row;
        let marker = if offset != 0 && offset == app.session.arrow() {
            Span::styled("->", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("  ")
        };
        let label = Span::styled(
            format!("{:>4}:", line_label(offset)),
            Style::default().fg(Color::Cyan),
        );
        label_lines.push(Line::from(vec![marker, label]));

        let value = stack[stack.len() - 1 - offset];
        value_lines.push(Line::from(formatter.format(value)));
    }
    (label_lines, value_lines)
}

/// Launch the calculator, restoring the terminal even on panic.
pub fn run(session: Session) -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut app = App::new(session);

    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal)));
    let restore_result = restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(payload) => {
            let _ = restore_result;
            if let Some(s) = payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
