//! CLI argument definitions for the IPL batting ETL.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use ipl_cli::pipeline::StageKind;

#[derive(Parser)]
#[command(
    name = "ipl-etl",
    version,
    about = "IPL batting ETL - extract, transform and load batting statistics",
    long_about = "Extract raw IPL batting statistics, derive strike rates and load them \
                  into SQLite.\n\n\
                  Each stage writes a CSV artifact under the data directory, so a failed \
                  run can be resumed from the last good artifact."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Pipeline configuration file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the artifacts and the database (overrides the config file).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the extract, transform and load chain, then notify.
    Run(RunArgs),

    /// Run a single task, as a scheduler would.
    Stage(StageArgs),

    /// Show the inferred schema and first rows of an artifact.
    Inspect(InspectArgs),

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Resume from this stage, reusing artifacts left by an earlier run.
    #[arg(long = "from", value_enum, default_value = "extract")]
    pub from: StageArg,

    /// Write the run report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct StageArgs {
    #[arg(value_enum)]
    pub task: TaskArg,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Artifact CSV file.
    #[arg(value_name = "ARTIFACT")]
    pub artifact: PathBuf,

    /// Number of rows to print.
    #[arg(long = "limit", default_value_t = 10)]
    pub limit: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StageArg {
    Extract,
    Transform,
    Load,
}

impl From<StageArg> for StageKind {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Extract => StageKind::Extract,
            StageArg::Transform => StageKind::Transform,
            StageArg::Load => StageKind::Load,
        }
    }
}

/// Scheduler task boundary: the three stages plus the notification.
#[derive(Clone, Copy, ValueEnum)]
pub enum TaskArg {
    Extract,
    Transform,
    Load,
    Notify,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
