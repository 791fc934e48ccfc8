//! Command-line arguments.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "zcalc",
    version,
    about = "A four-function calculator for the terminal",
    long_about = "A four-function calculator for the terminal.\n\n\
                  Operators apply left to right as they are typed: 2 + 3 * 4 = gives 20.\n\
                  Type keys separated by spaces or run together, e.g. `12.5*4=`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Read settings from this file instead of the default location.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (-q errors only, -qq silent).
    #[arg(short, long, action = ArgAction::Count, global = true, conflicts_with = "verbose")]
    pub quiet: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value = "full", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive calculator reading keys from stdin (the default).
    Repl,

    /// Press the given keys on a fresh calculator and print the entry.
    Eval(EvalArgs),
}

#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// Keys to press, e.g. `2+3*4=` or `5 / 0 enter`.
    #[arg(value_name = "KEYS", required = true, num_args = 1..)]
    pub keys: Vec<String>,

    /// Print the full calculator state as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Full,
    Compact,
}
