//! Immediate-execution calculator state machine.
//!
//! The engine accumulates typed digits in an entry buffer, folds chained
//! operators left to right without precedence, and records every successful
//! evaluation in a bounded history. It never pushes updates: callers invoke
//! an operation and then read back the entry, expression and history.

use super::format::{DEFAULT_SIGNIFICANT_DIGITS, format_result, parse_entry};
use super::history::{DEFAULT_HISTORY_CAPACITY, HistoryEntry, HistoryLog};
use super::operator::Operator;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Text held by the entry buffer while the engine is in the error state.
pub const ERROR_TEXT: &str = "Error";

/// Why an evaluation failed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Result out of range")]
    Overflow,
}

/// A key that extends the number being typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Digit {
    Number(u8),
    Point,
}

impl Digit {
    /// Parse a digit key. Both `.` and `,` are accepted as the decimal point.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | ',' => Some(Self::Point),
            '0'..='9' => c.to_digit(10).map(|d| Self::Number(d as u8)),
            _ => None,
        }
    }

    /// The key's character, or `None` for a number outside `0..=9`.
    pub fn to_char(self) -> Option<char> {
        match self {
            Self::Number(n) => char::from_digit(u32::from(n), 10),
            Self::Point => Some('.'),
        }
    }
}

/// An operator waiting for its right-hand operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingOperation {
    pub operator: Operator,
    pub operand: f64,
}

/// Short description of the last thing the engine did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ready,
    Cleared,
    EntryCleared,
    Typing,
    Editing,
    SignToggled,
    Operator(Operator),
    ResultReady,
    Failed(CalcError),
    LoadedFromHistory,
    HistoryCleared,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::Cleared => f.write_str("Cleared • Ready"),
            Self::EntryCleared => f.write_str("Entry cleared"),
            Self::Typing => f.write_str("Typing…"),
            Self::Editing => f.write_str("Editing value"),
            Self::SignToggled => f.write_str("Sign toggled"),
            Self::Operator(op) => write!(f, "Operator: {}", op),
            Self::ResultReady => f.write_str("Result ready"),
            Self::Failed(err) => write!(f, "Error • {}", err),
            Self::LoadedFromHistory => f.write_str("Loaded from history"),
            Self::HistoryCleared => f.write_str("History cleared"),
        }
    }
}

/// Everything a front-end needs to draw the calculator.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub entry: String,
    pub expression: String,
    pub active_operator: Option<Operator>,
    pub evaluated: bool,
    pub error: Option<String>,
    pub status: String,
    pub history: Vec<HistoryEntry>,
}

/// Calculator engine state.
#[derive(Clone, Debug)]
pub struct Calculator {
    entry: String,
    /// Unrounded value behind `entry` when it holds a computed result.
    exact: Option<f64>,
    error: Option<CalcError>,
    pending: Option<PendingOperation>,
    expression: String,
    evaluated: bool,
    history: HistoryLog,
    status: Status,
    significant_digits: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_options(DEFAULT_HISTORY_CAPACITY, DEFAULT_SIGNIFICANT_DIGITS)
    }

    /// Create an engine with a custom history size and result precision.
    pub fn with_options(history_capacity: usize, significant_digits: usize) -> Self {
        Self {
            entry: "0".to_string(),
            exact: None,
            error: None,
            pending: None,
            expression: String::new(),
            evaluated: false,
            history: HistoryLog::with_capacity(history_capacity),
            status: Status::Ready,
            significant_digits,
        }
    }

    /// The entry buffer: `0`, `Error`, or the numeral being typed or shown.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// The expression line, empty until an operator is chosen.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The expression line as shown on screen (`0` when empty).
    pub fn display_expression(&self) -> &str {
        if self.expression.is_empty() {
            "0"
        } else {
            &self.expression
        }
    }

    pub fn pending(&self) -> Option<PendingOperation> {
        self.pending
    }

    /// Operator to highlight, if one is waiting for its operand.
    pub fn active_operator(&self) -> Option<Operator> {
        self.pending.map(|p| p.operator)
    }

    /// Whether the entry holds a finalized result.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn error(&self) -> Option<CalcError> {
        self.error
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entry: self.entry.clone(),
            expression: self.display_expression().to_string(),
            active_operator: self.active_operator(),
            evaluated: self.evaluated,
            error: self.error.map(|e| e.to_string()),
            status: self.status.to_string(),
            history: self.history.iter().cloned().collect(),
        }
    }

    /// Extend the entry with a digit or decimal point.
    ///
    /// After a result or an error the entry starts over. A second decimal
    /// point is ignored and a leading `0` is replaced. A number outside
    /// `0..=9` is not a key and leaves the state untouched.
    pub fn append_digit(&mut self, digit: Digit) {
        let Some(c) = digit.to_char() else {
            return;
        };

        if self.error.is_some() || self.evaluated {
            self.reset();
        }

        match digit {
            Digit::Point => {
                if !self.entry.contains('.') {
                    self.entry.push('.');
                }
            }
            Digit::Number(_) => match self.entry.as_str() {
                "0" => self.entry = c.to_string(),
                "-0" => self.entry = format!("-{}", c),
                _ => self.entry.push(c),
            },
        }

        self.exact = None;
        self.status = Status::Typing;
    }

    /// Choose the operator applied to the current entry and the next one.
    ///
    /// An operator chosen while another is still pending evaluates the pending
    /// one first, so chains fold left: `2 + 3 × 4 =` is `20`.
    pub fn choose_operator(&mut self, operator: Operator) {
        if self.error.is_some() {
            return;
        }

        if self.pending.is_some() && !self.evaluated {
            self.evaluate();
            if self.error.is_some() {
                return;
            }
        }

        let operand = self.entry_value();
        self.expression = format!("{} {}", self.entry, operator.glyph());
        self.pending = Some(PendingOperation { operator, operand });
        self.set_entry_zero();
        self.evaluated = false;
        self.status = Status::Operator(operator);

        tracing::debug!(%operator, operand, "operator chosen");
    }

    /// Apply the pending operator to its operand and the entry.
    ///
    /// Does nothing without a pending operator or right after a result, so a
    /// repeated `=` leaves the state untouched.
    pub fn evaluate(&mut self) {
        if self.evaluated {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        let rhs = self.entry_value();
        self.expression = format!("{} {} =", self.expression, self.entry);
        self.evaluated = true;

        match pending.operator.apply(pending.operand, rhs) {
            None => self.fail(CalcError::DivisionByZero),
            Some(value) if !value.is_finite() => self.fail(CalcError::Overflow),
            Some(value) => {
                let result = format_result(value, self.significant_digits);
                tracing::debug!(expression = %self.expression, %result, "evaluated");

                self.history.push(HistoryEntry {
                    expression: self.expression.clone(),
                    result: result.clone(),
                    value,
                });
                self.entry = result;
                self.exact = Some(value);
                self.status = Status::ResultReady;
            }
        }
    }

    /// Reset everything except the history.
    pub fn clear_all(&mut self) {
        self.reset();
        self.status = Status::Cleared;
    }

    /// Reset only the entry. A pending operator survives.
    pub fn clear_entry(&mut self) {
        self.set_entry_zero();
        self.status = Status::EntryCleared;
    }

    /// Remove the last typed character.
    ///
    /// Results and errors cannot be edited and are cleared instead.
    pub fn backspace(&mut self) {
        if self.evaluated || self.error.is_some() {
            self.clear_entry();
            return;
        }

        let len = self.entry.chars().count();
        if len <= 1 || (len == 2 && self.entry.starts_with('-')) {
            self.entry = "0".to_string();
        } else {
            self.entry.pop();
        }
        self.exact = None;
        self.status = Status::Editing;
    }

    /// Toggle the sign of the entry. Ignored for `0` and errors.
    pub fn invert_sign(&mut self) {
        if self.error.is_some() || self.entry == "0" {
            return;
        }

        self.entry = match self.entry.strip_prefix('-') {
            Some(positive) => positive.to_string(),
            None => format!("-{}", self.entry),
        };
        self.exact = self.exact.map(|v| -v);
        self.status = Status::SignToggled;
    }

    /// Load a past result into the entry, newest entry being index 0.
    ///
    /// Returns `false` if there is no such entry.
    pub fn load_from_history(&mut self, index: usize) -> bool {
        let Some(item) = self.history.get(index).cloned() else {
            return false;
        };

        self.entry = item.result;
        self.exact = Some(item.value);
        self.error = None;
        self.pending = None;
        self.expression.clear();
        self.evaluated = true;
        self.status = Status::LoadedFromHistory;
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.status = Status::HistoryCleared;
    }

    fn entry_value(&self) -> f64 {
        self.exact.unwrap_or_else(|| parse_entry(&self.entry))
    }

    fn set_entry_zero(&mut self) {
        self.entry = "0".to_string();
        self.exact = None;
        self.error = None;
    }

    fn reset(&mut self) {
        self.set_entry_zero();
        self.pending = None;
        self.expression.clear();
        self.evaluated = false;
    }

    fn fail(&mut self, error: CalcError) {
        tracing::debug!(expression = %self.expression, %error, "evaluation failed");
        self.entry = ERROR_TEXT.to_string();
        self.exact = None;
        self.error = Some(error);
        self.pending = None;
        self.status = Status::Failed(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(calc: &mut Calculator, text: &str) {
        for c in text.chars() {
            calc.append_digit(Digit::from_char(c).unwrap());
        }
    }

    #[test]
    fn test_initial_state() {
        let calc = Calculator::new();
        assert_eq!(calc.entry(), "0");
        assert_eq!(calc.expression(), "");
        assert_eq!(calc.display_expression(), "0");
        assert!(calc.pending().is_none());
        assert!(!calc.is_evaluated());
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_leading_zero_replaced() {
        let mut calc = Calculator::new();
        digits(&mut calc, "007");
        assert_eq!(calc.entry(), "7");
    }

    #[test]
    fn test_point_on_zero_keeps_zero() {
        let mut calc = Calculator::new();
        digits(&mut calc, ".5");
        assert_eq!(calc.entry(), "0.5");
    }

    #[test]
    fn test_second_point_ignored() {
        let mut calc = Calculator::new();
        digits(&mut calc, "1.2.3");
        assert_eq!(calc.entry(), "1.23");
    }

    #[test]
    fn test_expression_text() {
        let mut calc = Calculator::new();
        digits(&mut calc, "3");
        calc.choose_operator(Operator::Add);
        assert_eq!(calc.expression(), "3 +");
        assert_eq!(calc.active_operator(), Some(Operator::Add));
        digits(&mut calc, "4");
        calc.evaluate();
        assert_eq!(calc.expression(), "3 + 4 =");
        assert_eq!(calc.entry(), "7");
        assert_eq!(calc.active_operator(), None);
        assert_eq!(calc.status(), Status::ResultReady);
    }

    #[test]
    fn test_evaluate_without_operator_is_noop() {
        let mut calc = Calculator::new();
        digits(&mut calc, "9");
        calc.evaluate();
        assert_eq!(calc.entry(), "9");
        assert!(!calc.is_evaluated());
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_operator_after_result_uses_result() {
        let mut calc = Calculator::new();
        digits(&mut calc, "6");
        calc.choose_operator(Operator::Multiply);
        digits(&mut calc, "7");
        calc.evaluate();
        calc.choose_operator(Operator::Subtract);
        assert_eq!(calc.expression(), "42 −");
        digits(&mut calc, "2");
        calc.evaluate();
        assert_eq!(calc.entry(), "40");
        assert_eq!(calc.history().len(), 2);
    }

    #[test]
    fn test_chaining_uses_full_precision() {
        let mut calc = Calculator::new();
        digits(&mut calc, "1");
        calc.choose_operator(Operator::Divide);
        digits(&mut calc, "3");
        calc.evaluate();
        assert_eq!(calc.entry(), "0.333333333333");
        calc.choose_operator(Operator::Multiply);
        digits(&mut calc, "3");
        calc.evaluate();
        assert_eq!(calc.entry(), "1");
    }

    #[test]
    fn test_implicit_division_by_zero_stops_chain() {
        let mut calc = Calculator::new();
        digits(&mut calc, "5");
        calc.choose_operator(Operator::Divide);
        digits(&mut calc, "0");
        calc.choose_operator(Operator::Add);
        assert_eq!(calc.entry(), ERROR_TEXT);
        assert_eq!(calc.error(), Some(CalcError::DivisionByZero));
        assert!(calc.pending().is_none());
        assert_eq!(calc.status().to_string(), "Error • Division by zero");
    }

    #[test]
    fn test_operator_ignored_in_error_state() {
        let mut calc = Calculator::new();
        digits(&mut calc, "1");
        calc.choose_operator(Operator::Divide);
        calc.evaluate();
        calc.choose_operator(Operator::Add);
        assert_eq!(calc.entry(), ERROR_TEXT);
        assert!(calc.pending().is_none());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut calc = Calculator::new();
        digits(&mut calc, "1");
        digits(&mut calc, &"0".repeat(300));
        calc.choose_operator(Operator::Multiply);
        digits(&mut calc, "1");
        digits(&mut calc, &"0".repeat(300));
        calc.evaluate();
        assert_eq!(calc.entry(), ERROR_TEXT);
        assert_eq!(calc.error(), Some(CalcError::Overflow));
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_clear_entry_keeps_pending() {
        let mut calc = Calculator::new();
        digits(&mut calc, "8");
        calc.choose_operator(Operator::Add);
        digits(&mut calc, "5");
        calc.clear_entry();
        assert_eq!(calc.entry(), "0");
        assert_eq!(calc.expression(), "8 +");
        digits(&mut calc, "2");
        calc.evaluate();
        assert_eq!(calc.entry(), "10");
    }

    #[test]
    fn test_clear_entry_recovers_from_error() {
        let mut calc = Calculator::new();
        digits(&mut calc, "5");
        calc.choose_operator(Operator::Divide);
        calc.evaluate();
        calc.clear_entry();
        assert_eq!(calc.entry(), "0");
        assert!(calc.error().is_none());
    }

    #[test]
    fn test_clear_all_keeps_history() {
        let mut calc = Calculator::new();
        digits(&mut calc, "2");
        calc.choose_operator(Operator::Add);
        digits(&mut calc, "2");
        calc.evaluate();
        calc.clear_all();
        assert_eq!(calc.entry(), "0");
        assert_eq!(calc.expression(), "");
        assert!(!calc.is_evaluated());
        assert_eq!(calc.history().len(), 1);
        assert_eq!(calc.status().to_string(), "Cleared • Ready");
    }

    #[test]
    fn test_backspace() {
        let mut calc = Calculator::new();
        digits(&mut calc, "12.5");
        calc.backspace();
        assert_eq!(calc.entry(), "12.");
        calc.backspace();
        calc.backspace();
        assert_eq!(calc.entry(), "1");
        calc.backspace();
        assert_eq!(calc.entry(), "0");
        calc.backspace();
        assert_eq!(calc.entry(), "0");
    }

    #[test]
    fn test_backspace_after_result_clears() {
        let mut calc = Calculator::new();
        digits(&mut calc, "12");
        calc.choose_operator(Operator::Add);
        digits(&mut calc, "30");
        calc.evaluate();
        calc.backspace();
        assert_eq!(calc.entry(), "0");
        assert_eq!(calc.status(), Status::EntryCleared);
    }

    #[test]
    fn test_invert_sign_ignores_zero() {
        let mut calc = Calculator::new();
        calc.invert_sign();
        assert_eq!(calc.entry(), "0");
        assert_eq!(calc.status(), Status::Ready);
    }

    #[test]
    fn test_invert_sign_of_result_negates_exact_value() {
        let mut calc = Calculator::new();
        digits(&mut calc, "2");
        calc.choose_operator(Operator::Divide);
        digits(&mut calc, "3");
        calc.evaluate();
        calc.invert_sign();
        assert_eq!(calc.entry(), "-0.666666666667");
        calc.choose_operator(Operator::Multiply);
        digits(&mut calc, "3");
        calc.evaluate();
        assert_eq!(calc.entry(), "-2");
    }

    #[test]
    fn test_digit_after_negative_zero() {
        let mut calc = Calculator::new();
        digits(&mut calc, "0.");
        calc.invert_sign();
        calc.backspace();
        assert_eq!(calc.entry(), "-0");
        digits(&mut calc, "4");
        assert_eq!(calc.entry(), "-4");
    }

    #[test]
    fn test_load_from_history() {
        let mut calc = Calculator::new();
        digits(&mut calc, "4");
        calc.choose_operator(Operator::Multiply);
        digits(&mut calc, "5");
        calc.evaluate();
        calc.clear_all();

        assert!(calc.load_from_history(0));
        assert_eq!(calc.entry(), "20");
        assert_eq!(calc.expression(), "");
        assert!(calc.is_evaluated());
        assert!(calc.pending().is_none());

        digits(&mut calc, "3");
        assert_eq!(calc.entry(), "3");
    }

    #[test]
    fn test_load_missing_history_entry() {
        let mut calc = Calculator::new();
        digits(&mut calc, "8");
        assert!(!calc.load_from_history(0));
        assert_eq!(calc.entry(), "8");
    }

    #[test]
    fn test_clear_history() {
        let mut calc = Calculator::new();
        digits(&mut calc, "1");
        calc.choose_operator(Operator::Add);
        digits(&mut calc, "1");
        calc.evaluate();
        calc.clear_history();
        assert!(calc.history().is_empty());
        assert_eq!(calc.entry(), "2");
    }

    #[test]
    fn test_out_of_range_number_ignored() {
        let mut calc = Calculator::new();
        digits(&mut calc, "4");
        calc.append_digit(Digit::Number(10));
        calc.append_digit(Digit::Number(12));
        assert_eq!(calc.entry(), "4");
        assert_eq!(Digit::Number(10).to_char(), None);
    }

    #[test]
    fn test_out_of_range_number_keeps_result() {
        let mut calc = Calculator::new();
        digits(&mut calc, "2");
        calc.choose_operator(Operator::Add);
        digits(&mut calc, "2");
        calc.evaluate();
        calc.append_digit(Digit::Number(200));
        assert_eq!(calc.entry(), "4");
        assert!(calc.is_evaluated());
    }

    #[test]
    fn test_digit_from_char() {
        assert_eq!(Digit::from_char('7'), Some(Digit::Number(7)));
        assert_eq!(Digit::from_char('.'), Some(Digit::Point));
        assert_eq!(Digit::from_char(','), Some(Digit::Point));
        assert_eq!(Digit::from_char('a'), None);
    }

    #[test]
    fn test_snapshot() {
        let mut calc = Calculator::new();
        digits(&mut calc, "9");
        calc.choose_operator(Operator::Divide);
        let snapshot = calc.snapshot();
        assert_eq!(snapshot.entry, "0");
        assert_eq!(snapshot.expression, "9 ÷");
        assert_eq!(snapshot.active_operator, Some(Operator::Divide));
        assert_eq!(snapshot.status, "Operator: ÷");
        assert!(snapshot.error.is_none());
    }
}
