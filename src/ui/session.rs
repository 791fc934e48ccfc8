//! Interactive calculator session.
//!
//! Each input line is a run of keys. After every line the screen is drawn
//! again from the engine state.

use crate::calculator::{
    Calculator, ClipboardError, Key, KeyError, Operator, Snapshot, copy_to_clipboard, parse_keys,
};
use crate::config::Config;
use crate::ui::render::{display_number, render_screen};
use std::io::{BufRead, Write};

/// Help text listing the keys the session understands.
pub fn help_text() -> String {
    let keys: Vec<String> = Operator::ALL.iter().map(|op| op.key().to_string()).collect();
    let glyphs: Vec<&str> = Operator::ALL.iter().map(|op| op.glyph()).collect();

    format!(
        "\
Keys: 0-9 . , {} (or {}) = enter
      c/esc/delete  clear all       ce  clear entry
      bs/backspace  delete last     neg toggle sign
      h<N>          load history N  clear-history
      copy          copy the entry to the clipboard
Commands: help, quit
",
        keys.join(" "),
        glyphs.join(" ")
    )
}

/// What the session should do after a line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Redraw,
    /// Redraw with a message shown above the screen.
    Message(String),
    Quit,
}

/// Calculator plus the settings that affect how it is driven.
pub struct Session {
    calculator: Calculator,
    group_thousands: bool,
    copy_results: bool,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            calculator: config.calculator(),
            group_thousands: config.group_thousands,
            copy_results: config.copy_results,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Current entry, formatted the way the screen shows it.
    pub fn display_entry(&self) -> String {
        display_number(self.calculator.entry(), self.group_thousands)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.calculator.snapshot()
    }

    pub fn render(&self) -> String {
        render_screen(&self.calculator, self.group_thousands)
    }

    /// Handle one line of input.
    ///
    /// An invalid line is rejected as a whole before any key is pressed.
    pub fn handle_line(&mut self, line: &str) -> Result<Outcome, KeyError> {
        match line.trim().to_lowercase().as_str() {
            "quit" | "exit" | "q" => return Ok(Outcome::Quit),
            "help" | "?" => return Ok(Outcome::Message(help_text())),
            _ => {}
        }

        let keys = parse_keys(line)?;
        tracing::trace!(?keys, "keys");

        let mut messages = Vec::new();
        for key in keys {
            if let Some(message) = self.press(key) {
                messages.push(message);
            }
        }

        if messages.is_empty() {
            Ok(Outcome::Redraw)
        } else {
            Ok(Outcome::Message(messages.join("\n")))
        }
    }

    /// Press one key, returning a message for the user if there is one.
    pub fn press(&mut self, key: Key) -> Option<String> {
        match key {
            Key::Copy => Some(self.copy_entry()),
            Key::LoadHistory(index) => {
                if self.calculator.press(key) {
                    None
                } else {
                    Some(format!("No history entry {}", index + 1))
                }
            }
            Key::Equals => {
                let was_evaluated = self.calculator.is_evaluated();
                self.calculator.press(key);
                let new_result = !was_evaluated
                    && self.calculator.is_evaluated()
                    && self.calculator.error().is_none();
                (new_result && self.copy_results).then(|| self.copy_entry())
            }
            _ => {
                self.calculator.press(key);
                None
            }
        }
    }

    fn copy_entry(&self) -> String {
        let result = if self.calculator.error().is_some() {
            Err(ClipboardError::NothingToCopy)
        } else {
            copy_to_clipboard(self.calculator.entry())
        };

        match result {
            Ok(()) => format!("Copied {}", self.calculator.entry()),
            Err(e) => {
                tracing::warn!("{}", e);
                e.to_string()
            }
        }
    }
}

/// Run the interactive loop until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(config: &Config, input: R, mut output: W) -> std::io::Result<()> {
    let mut session = Session::new(config);
    write!(output, "{}", session.render())?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match session.handle_line(&line) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Redraw) => {}
            Ok(Outcome::Message(message)) => writeln!(output, "{}", message.trim_end())?,
            Err(e) => {
                writeln!(output, "{} (type `help` for keys)", e)?;
                continue;
            }
        }
        writeln!(output)?;
        write!(output, "{}", session.render())?;
        output.flush()?;
    }

    Ok(())
}
