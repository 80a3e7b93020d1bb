use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use haarvi_core::{load_inputs, run_pipeline};
use haarvi_ingest::latest_export;
use haarvi_model::{ReferenceInstant, ScheduleConfig};
use haarvi_output::{schedule_path, write_schedule_file};
use tracing::{info, info_span};

use crate::types::{RunOptions, ScheduleResult};

/// Appointment log file name expected next to the exports.
pub const DEFAULT_APPOINTMENT_LOG: &str = "all_haarvi_bd_apts.csv";

/// Loads the configuration file, or the built-in layout when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ScheduleConfig> {
    match path {
        Some(path) => ScheduleConfig::from_json_file(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(ScheduleConfig::default()),
    }
}

/// The run's single reference instant.
pub fn reference_instant(options: &RunOptions) -> ReferenceInstant {
    match options.as_of {
        Some(date) => ReferenceInstant::start_of(date),
        None => ReferenceInstant::capture(),
    }
}

pub fn run_schedule(options: &RunOptions) -> Result<ScheduleResult> {
    let export_dir = &options.export_dir;
    let run_span = info_span!("schedule", export_dir = %export_dir.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let config = load_config(options.config.as_deref())?;
    let reference = reference_instant(options);
    info!(reference = %reference.now(), "reference instant captured");

    let appointments_path = options
        .appointments
        .clone()
        .unwrap_or_else(|| export_dir.join(DEFAULT_APPOINTMENT_LOG));
    // Earlier schedules and the log share the export directory.
    let mut ignored = vec![config.output_file_prefix.as_str()];
    if let Some(log_name) = appointments_path.file_name().and_then(|name| name.to_str()) {
        ignored.push(log_name);
    }
    let export_path = latest_export(export_dir, &config.export_file_prefix, &ignored)
        .with_context(|| format!("locate export in {}", export_dir.display()))?;
    info!(
        export = %export_path.display(),
        appointments = %appointments_path.display(),
        "using inputs"
    );

    let (export, log) = load_inputs(&export_path, &appointments_path).context("read inputs")?;
    let output = run_pipeline(export, &log, &config, &reference).context("run pipeline")?;

    let output_dir: PathBuf = options
        .output_dir
        .clone()
        .unwrap_or_else(|| export_dir.clone());
    let path = schedule_path(&output_dir, &config, &reference);
    let written = if options.dry_run {
        info!(path = %path.display(), "dry run, schedule not written");
        false
    } else {
        write_schedule_file(&path, &config, &output.rows)
            .with_context(|| format!("write {}", path.display()))?;
        true
    };

    info!(
        scheduled = output.rows.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    Ok(ScheduleResult {
        export_path,
        appointments_path,
        schedule_path: path,
        written,
        config,
        output,
    })
}
