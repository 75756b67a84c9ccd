//! IPL batting ETL CLI.

use clap::{ColorChoice, Parser};
use ipl_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{load_config, run_inspect, run_pipeline, run_task, show_config};
use crate::summary::{print_run_summary, print_stage_record};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match dispatch(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn dispatch(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Command::Run(args) => {
            let config = load_config(cli)?;
            let report = run_pipeline(&config, args)?;
            print_run_summary(&report);
            Ok(if report.succeeded() { 0 } else { 1 })
        }
        Command::Stage(args) => {
            let config = load_config(cli)?;
            if let Some(record) = run_task(&config, args.task)? {
                print_stage_record(&record);
            }
            Ok(0)
        }
        Command::Inspect(args) => {
            run_inspect(args)?;
            Ok(0)
        }
        Command::Config => {
            show_config(&load_config(cli)?)?;
            Ok(0)
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
///
/// An explicit `--log-level` wins over `-v`/`-q`; either one disables
/// `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level(level)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_format(format)
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone())
}
