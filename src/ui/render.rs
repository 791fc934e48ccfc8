//! Text rendering of the calculator screen and history list.

use crate::calculator::{Calculator, HistoryLog, Operator, group_thousands};
use std::fmt::Write;

/// Width of the calculator display, in characters.
const DISPLAY_WIDTH: usize = 32;

/// Accent shown when no operator is active.
const NEUTRAL_ACCENT: &str = "neutral";

/// Format entry or result text for display.
pub fn display_number(text: &str, group: bool) -> String {
    if group {
        group_thousands(text)
    } else {
        text.to_string()
    }
}

/// Render the display: expression line, entry line, operator keys, status.
///
/// The entry is shown as `= value`. The active operator is bracketed in the
/// keypad row and its accent follows the status, e.g.
/// `[Operator: × • multiplication]`.
pub fn render_display(calc: &Calculator, group: bool) -> String {
    let mut out = String::new();

    let expression = calc.display_expression();
    let entry = format!("= {}", display_number(calc.entry(), group));

    let _ = writeln!(out, "{:>width$}", expression, width = DISPLAY_WIDTH);
    let _ = writeln!(out, "{:>width$}", entry, width = DISPLAY_WIDTH);
    let _ = writeln!(out, "{}", render_operator_row(calc.active_operator()));
    let _ = writeln!(
        out,
        "[{} • {}]",
        calc.status(),
        accent(calc.active_operator())
    );

    out
}

/// Theme accent for the active operator.
pub fn accent(active: Option<Operator>) -> &'static str {
    active.map_or(NEUTRAL_ACCENT, Operator::accent)
}

fn render_operator_row(active: Option<Operator>) -> String {
    Operator::ALL
        .iter()
        .map(|&op| {
            if Some(op) == active {
                format!("[{}]", op.glyph())
            } else {
                format!(" {} ", op.glyph())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the history list, newest first and numbered from 1.
pub fn render_history(history: &HistoryLog, group: bool) -> String {
    if history.is_empty() {
        return "No calculations yet.\n".to_string();
    }

    let mut out = String::new();
    for (i, item) in history.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}  {}",
            i + 1,
            item.expression,
            display_number(&item.result, group)
        );
    }
    out
}

/// Render the whole screen.
pub fn render_screen(calc: &Calculator, group: bool) -> String {
    format!(
        "{}\nHistory\n{}",
        render_display(calc, group),
        render_history(calc.history(), group)
    )
}
