//! The eligibility pipeline, stage by stage.
//!
//! # Stage Order
//!
//! 1. **Date normalization** - birthdate and event date columns become dates
//! 2. **Age validation** - derive age, drop rows outside the allowed range
//! 3. **Status filter** - drop inactive participants
//! 4. **Identity merge** - build the normalized PTID, drop rows without one
//! 5. **Appointment history** - join the appointment log, drop participants
//!    with too many recent draws
//! 6. **Event projection** - evaluate every category and offset
//! 7. **Output selection** - keep participants with a due appointment
//!
//! Stages 1-4 work on the Polars frame read from the export; the remaining
//! stages work on typed participant records built from it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use haarvi_ingest::read_csv_table;
use haarvi_model::{EligibilityKey, ReferenceInstant, ScheduleConfig, ScheduleRow};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::age::validate_ages;
use crate::appointments::{AppointmentLog, join_appointments};
use crate::dates::normalize_dates;
use crate::error::Result;
use crate::identity::merge_identifiers;
use crate::projection::project_category;
use crate::roster::build_roster;
use crate::selection::select_schedule;
use crate::status::filter_status;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    DateNormalization,
    AgeValidation,
    StatusFilter,
    IdentityMerge,
    AppointmentHistory,
    EventProjection,
    OutputSelection,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::DateNormalization => "date_normalization",
            Stage::AgeValidation => "age_validation",
            Stage::StatusFilter => "status_filter",
            Stage::IdentityMerge => "identity_merge",
            Stage::AppointmentHistory => "appointment_history",
            Stage::EventProjection => "event_projection",
            Stage::OutputSelection => "output_selection",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row counts around one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub rows_in: usize,
    pub rows_out: usize,
}

impl StageReport {
    pub fn removed(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

/// What a pipeline run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub reference: ReferenceInstant,
    pub stages: Vec<StageReport>,
    /// Configured event date columns the export did not contain.
    pub missing_date_columns: Vec<String>,
    /// Participants eligible for each label, counted on the final schedule.
    pub label_counts: BTreeMap<EligibilityKey, usize>,
    /// Distinct participants found in the appointment log.
    pub logged_participants: usize,
}

impl PipelineReport {
    fn new(reference: ReferenceInstant) -> Self {
        Self {
            reference,
            stages: Vec::new(),
            missing_date_columns: Vec::new(),
            label_counts: BTreeMap::new(),
            logged_participants: 0,
        }
    }

    fn record(&mut self, stage: Stage, rows_in: usize, rows_out: usize, started: Instant) {
        info!(
            stage = %stage,
            rows_in,
            rows_out,
            removed = rows_in.saturating_sub(rows_out),
            duration_ms = started.elapsed().as_millis(),
            "stage complete"
        );
        self.stages.push(StageReport {
            stage,
            rows_in,
            rows_out,
        });
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    /// Rows in the export before any stage ran.
    pub fn input_rows(&self) -> usize {
        self.stages.first().map_or(0, |report| report.rows_in)
    }

    /// Rows on the final schedule.
    pub fn output_rows(&self) -> usize {
        self.stages.last().map_or(0, |report| report.rows_out)
    }
}

/// Schedule rows plus the run report.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub rows: Vec<ScheduleRow>,
    pub report: PipelineReport,
}

/// Reads the participant export and the appointment log.
pub fn load_inputs(export_path: &Path, log_path: &Path) -> Result<(DataFrame, DataFrame)> {
    let (export, _) = read_csv_table(export_path)?;
    let (log, _) = read_csv_table(log_path)?;
    info!(
        export = %export_path.display(),
        export_rows = export.height(),
        log = %log_path.display(),
        log_rows = log.height(),
        "inputs loaded"
    );
    Ok((export, log))
}

/// Runs every stage against one reference instant.
///
/// Any missing required column aborts the run before a schedule is
/// produced. Row-level problems only remove rows.
pub fn run_pipeline(
    mut export: DataFrame,
    appointment_log: &DataFrame,
    config: &ScheduleConfig,
    reference: &ReferenceInstant,
) -> Result<PipelineOutput> {
    config.validate()?;
    let mut report = PipelineReport::new(*reference);
    let columns = &config.export;

    let configured = config.date_columns();
    let present = info_span!("date_normalization").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let rows = export.height();
        let present = normalize_dates(&mut export, &columns.dob, &configured)?;
        report.record(Stage::DateNormalization, rows, export.height(), start);
        Ok(present)
    })?;
    report.missing_date_columns = configured
        .iter()
        .filter(|column| !present.contains(column))
        .cloned()
        .collect();

    info_span!("age_validation").in_scope(|| -> Result<()> {
        let start = Instant::now();
        let rows = export.height();
        validate_ages(&mut export, &columns.dob, config.age_bounds, reference)?;
        report.record(Stage::AgeValidation, rows, export.height(), start);
        Ok(())
    })?;

    info_span!("status_filter").in_scope(|| -> Result<()> {
        let start = Instant::now();
        let rows = export.height();
        filter_status(&mut export, &columns.status_prefix)?;
        report.record(Stage::StatusFilter, rows, export.height(), start);
        Ok(())
    })?;

    info_span!("identity_merge").in_scope(|| -> Result<()> {
        let start = Instant::now();
        let rows = export.height();
        merge_identifiers(&mut export, &columns.convalescent_id, &columns.control_id)?;
        report.record(Stage::IdentityMerge, rows, export.height(), start);
        Ok(())
    })?;

    let table = build_roster(&export, columns, &present)?;

    let table = info_span!("appointment_history").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let log = AppointmentLog::from_frame(appointment_log, &config.appointment_log)?;
        report.logged_participants = log.participant_count();
        let rows = table.len();
        let (table, _) = join_appointments(
            table,
            &log,
            reference,
            config.recent_window_weeks,
            config.max_recent_appointments,
        );
        report.record(Stage::AppointmentHistory, rows, table.len(), start);
        Ok(table)
    })?;

    let mut table = table;
    info_span!("event_projection").in_scope(|| {
        let start = Instant::now();
        for category in &config.categories {
            let added = project_category(
                &mut table,
                category.category,
                &category.columns,
                &category.offsets,
                reference,
            );
            info!(category = %category.category, added, "category evaluated");
        }
        report.record(Stage::EventProjection, table.len(), table.len(), start);
    });

    let rows = info_span!("output_selection").in_scope(|| {
        let start = Instant::now();
        let rows_in = table.len();
        let rows = select_schedule(table);
        report.record(Stage::OutputSelection, rows_in, rows.len(), start);
        rows
    });

    for row in &rows {
        for key in &row.eligible_appointments {
            *report.label_counts.entry(*key).or_insert(0) += 1;
        }
    }

    info!(
        month = reference.month(),
        year = reference.year(),
        scheduled = rows.len(),
        "schedule ready"
    );
    Ok(PipelineOutput { rows, report })
}
