//! Calculator module for immediate-execution arithmetic.
//!
//! This module provides functionality to:
//! - Accumulate typed numbers and chain the four basic operators
//! - Keep a bounded history of completed calculations
//! - Map keyboard tokens to calculator operations
//! - Copy results to the clipboard

mod clipboard;
mod engine;
mod format;
mod history;
mod keys;
mod operator;

pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use engine::{CalcError, Calculator, Digit, ERROR_TEXT, PendingOperation, Snapshot, Status};
pub use format::{
    DEFAULT_SIGNIFICANT_DIGITS, MAX_SIGNIFICANT_DIGITS, format_result, group_thousands,
    round_significant,
};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryEntry, HistoryLog};
pub use keys::{Key, KeyError, parse_key, parse_keys};
pub use operator::Operator;
