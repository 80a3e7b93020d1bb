//! Schedule CSV layout and writers.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use haarvi_model::{ReferenceInstant, ScheduleConfig, ScheduleRow};
use tracing::info;

use crate::error::{OutputError, Result};

/// Separator between entries of a list cell.
pub const LIST_SEPARATOR: &str = ";";

const PTID_HEADER: &str = "ptid";
const AGE_HEADER: &str = "age";
const ELIGIBLE_HEADER: &str = "eligible_apts";

/// Header row: export identity columns, age, appointment dates, labels.
pub fn schedule_headers(config: &ScheduleConfig) -> [String; 6] {
    [
        config.export.global_study_id.clone(),
        PTID_HEADER.to_string(),
        config.export.email.clone(),
        AGE_HEADER.to_string(),
        config.appointment_log.date_column.clone(),
        ELIGIBLE_HEADER.to_string(),
    ]
}

/// One CSV record. List cells are joined with [`LIST_SEPARATOR`]; a
/// participant without appointment history gets an empty dates cell.
pub fn schedule_record(row: &ScheduleRow) -> [String; 6] {
    [
        row.global_study_id.clone().unwrap_or_default(),
        row.ptid.to_string(),
        row.email.clone().unwrap_or_default(),
        row.age.to_string(),
        row.appointment_dates().join(LIST_SEPARATOR),
        row.labels().join(LIST_SEPARATOR),
    ]
}

/// Writes the header and every row to `writer`.
pub fn write_schedule<W: Write>(
    writer: W,
    config: &ScheduleConfig,
    rows: &[ScheduleRow],
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(schedule_headers(config))?;
    for row in rows {
        wtr.write_record(schedule_record(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Path of the schedule for the reference month inside `output_dir`.
pub fn schedule_path(
    output_dir: &Path,
    config: &ScheduleConfig,
    reference: &ReferenceInstant,
) -> PathBuf {
    output_dir.join(config.output_file_name(reference))
}

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Writes the schedule to `path`, replacing any existing file.
pub fn write_schedule_file(
    path: &Path,
    config: &ScheduleConfig,
    rows: &[ScheduleRow],
) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = fs::File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_schedule(file, config, rows).map_err(|source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), "schedule written");
    Ok(())
}
