//! A four-function, immediate-execution calculator.
//!
//! The engine lives in [`calculator`]; [`ui`] is a terminal front-end that
//! drives it from typed keys.

pub mod calculator;
pub mod cli;
pub mod config;
pub mod logging;
pub mod ui;
