use std::path::PathBuf;

use chrono::NaiveDate;
use haarvi_core::PipelineOutput;
use haarvi_model::ScheduleConfig;

/// Inputs for one scheduling run, resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub export_dir: PathBuf,
    /// Appointment log; defaults to the standard log file in `export_dir`.
    pub appointments: Option<PathBuf>,
    /// Where the schedule is written; defaults to `export_dir`.
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Pins the reference date instead of using the local clock.
    pub as_of: Option<NaiveDate>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct ScheduleResult {
    pub export_path: PathBuf,
    pub appointments_path: PathBuf,
    pub schedule_path: PathBuf,
    /// False on a dry run.
    pub written: bool,
    pub config: ScheduleConfig,
    pub output: PipelineOutput,
}
