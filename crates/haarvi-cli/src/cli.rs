//! CLI argument definitions for the HAARVI scheduler.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use haarvi_cli::types::RunOptions;

#[derive(Parser)]
#[command(
    name = "haarvi-schedule",
    version,
    about = "Select HAARVI participants due for a follow-up blood draw this month",
    long_about = "Select HAARVI participants due for a follow-up blood draw this month.\n\n\
                  Reads the newest REDCap Timeline Check export and the blood-draw\n\
                  appointment log, then writes haarvi_apts_<month>_<year>.csv."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Build this month's follow-up schedule.
    Run(RunArgs),

    /// List the event categories, their date columns and offsets.
    Categories {
        /// JSON configuration overriding the built-in column layout.
        #[arg(long = "config", value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[derive(Parser)]
pub struct RunArgs {
    /// Folder holding the REDCap exports and the appointment log.
    #[arg(value_name = "EXPORT_DIR")]
    pub export_dir: PathBuf,

    /// Appointment log CSV (default: <EXPORT_DIR>/all_haarvi_bd_apts.csv).
    #[arg(long = "appointments", value_name = "PATH")]
    pub appointments: Option<PathBuf>,

    /// Output directory for the schedule (default: <EXPORT_DIR>).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON configuration overriding the built-in column layout.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today.
    #[arg(long = "as-of", value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Run every stage and report without writing the schedule.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        Self {
            export_dir: args.export_dir,
            appointments: args.appointments,
            output_dir: args.output_dir,
            config: args.config,
            as_of: args.as_of,
            dry_run: args.dry_run,
        }
    }
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
