//! Keyboard token mapping.
//!
//! Turns typed input such as `12.5 * 4 =` or `2+3 neg enter` into a sequence
//! of [`Key`]s and dispatches them to a [`Calculator`].

use super::engine::{Calculator, Digit};
use super::operator::Operator;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// A single calculator key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(Digit),
    Operator(Operator),
    Equals,
    ClearAll,
    ClearEntry,
    Backspace,
    InvertSign,
    /// Load a history entry, 0 being the newest.
    LoadHistory(usize),
    ClearHistory,
    /// Copy the entry to the clipboard. Handled by the front-end.
    Copy,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown key `{0}`")]
    Unknown(String),
    #[error("history entries are numbered from 1, got `{0}`")]
    HistoryIndex(String),
}

lazy_static! {
    /// One key token. Longer names come first so `ce` wins over `c`.
    static ref KEY_TOKEN: Regex = Regex::new(
        r"(?i)history\s*\d+|h\s*\d+|clear-history|backspace|escape|delete|enter|copy|neg|esc|del|ce|ac|bs|[0-9.,=+\-*/x×÷−±c<]"
    ).unwrap();

    /// A history reference such as `h2` or `history 2`.
    static ref HISTORY_REF: Regex = Regex::new(r"(?i)^h(?:istory)?\s*(\d+)$").unwrap();
}

/// Parse a single key token.
pub fn parse_key(token: &str) -> Result<Key, KeyError> {
    let token = token.trim();

    if let Some(caps) = HISTORY_REF.captures(token) {
        let number: usize = caps[1]
            .parse()
            .map_err(|_| KeyError::HistoryIndex(token.to_string()))?;
        return number
            .checked_sub(1)
            .map(Key::LoadHistory)
            .ok_or_else(|| KeyError::HistoryIndex(token.to_string()));
    }

    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && let Some(digit) = Digit::from_char(c)
    {
        return Ok(Key::Digit(digit));
    }

    if let Some(op) = Operator::from_token(&token.to_lowercase()) {
        return Ok(Key::Operator(op));
    }

    match token.to_lowercase().as_str() {
        "=" | "enter" => Ok(Key::Equals),
        "escape" | "esc" | "delete" | "del" | "c" | "ac" => Ok(Key::ClearAll),
        "ce" => Ok(Key::ClearEntry),
        "backspace" | "bs" | "<" => Ok(Key::Backspace),
        "neg" | "±" => Ok(Key::InvertSign),
        "clear-history" => Ok(Key::ClearHistory),
        "copy" => Ok(Key::Copy),
        _ => Err(KeyError::Unknown(token.to_string())),
    }
}

/// Split a line of input into keys.
///
/// Keys may be separated by whitespace or run together (`2+3*4=`). Anything
/// that is not a key makes the whole line invalid.
pub fn parse_keys(input: &str) -> Result<Vec<Key>, KeyError> {
    let mut keys = Vec::new();
    let mut last_end = 0;

    for m in KEY_TOKEN.find_iter(input) {
        check_gap(&input[last_end..m.start()])?;
        keys.push(parse_key(m.as_str())?);
        last_end = m.end();
    }
    check_gap(&input[last_end..])?;

    Ok(keys)
}

fn check_gap(gap: &str) -> Result<(), KeyError> {
    match gap.split_whitespace().next() {
        Some(word) => Err(KeyError::Unknown(word.to_string())),
        None => Ok(()),
    }
}

impl Calculator {
    /// Dispatch a key to the matching engine operation.
    ///
    /// Returns `false` for keys the engine does not handle itself
    /// ([`Key::Copy`]) and for history references that do not exist.
    pub fn press(&mut self, key: Key) -> bool {
        match key {
            Key::Digit(digit) => self.append_digit(digit),
            Key::Operator(op) => self.choose_operator(op),
            Key::Equals => self.evaluate(),
            Key::ClearAll => self.clear_all(),
            Key::ClearEntry => self.clear_entry(),
            Key::Backspace => self.backspace(),
            Key::InvertSign => self.invert_sign(),
            Key::LoadHistory(index) => return self.load_from_history(index),
            Key::ClearHistory => self.clear_history(),
            Key::Copy => return false,
        }
        true
    }
}
