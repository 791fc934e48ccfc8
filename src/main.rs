use anyhow::Context;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use zcalc::cli::{Cli, Command, EvalArgs, LogFormatArg};
use zcalc::config::Config;
use zcalc::logging::{LogConfig, LogFormat, init_logging};
use zcalc::ui::{self, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig {
        format: match cli.log_format {
            LogFormatArg::Full => LogFormat::Full,
            LogFormatArg::Compact => LogFormat::Compact,
        },
        with_ansi: io::stderr().is_terminal(),
        ..LogConfig::from_verbosity(cli.verbose, cli.quiet)
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    tracing::debug!(?config, "config");

    match cli.command {
        None | Some(Command::Repl) => {
            let stdin = io::stdin();
            ui::run(&config, stdin.lock(), io::stdout().lock())
                .context("terminal session failed")?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Eval(args)) => eval(&config, &args),
    }
}

fn eval(config: &Config, args: &EvalArgs) -> anyhow::Result<ExitCode> {
    let mut session = Session::new(config);
    let line = args.keys.join(" ");
    let outcome = session
        .handle_line(&line)
        .with_context(|| format!("invalid keys: {line}"))?;
    if let ui::Outcome::Message(message) = outcome {
        eprintln!("{message}");
    }

    if args.json {
        let json = serde_json::to_string_pretty(&session.snapshot())
            .context("failed to serialize calculator state")?;
        println!("{json}");
    } else {
        println!("{}", session.display_entry());
    }

    match session.calculator().error() {
        Some(e) => {
            tracing::warn!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}
