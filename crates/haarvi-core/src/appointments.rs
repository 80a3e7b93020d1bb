//! The blood-draw appointment log and its join onto the participant table.

use std::collections::BTreeMap;

use haarvi_model::{
    AppointmentEntry, AppointmentHistory, AppointmentLogColumns, ParticipantTable, Ptid,
    ReferenceInstant,
};
use polars::prelude::*;
use tracing::debug;

use crate::dates::parse_datetime;
use crate::error::Result;
use crate::frame::{cell_text, require_column};

/// Appointment log rows grouped by normalized participant identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentLog {
    groups: BTreeMap<Ptid, Vec<AppointmentEntry>>,
}

impl AppointmentLog {
    /// Groups a log frame by identifier.
    ///
    /// Identifiers get the same normalization as the participant export.
    /// Rows with a blank identifier or a blank date are ignored; a date that
    /// does not parse is kept as text with no instant.
    pub fn from_frame(df: &DataFrame, columns: &AppointmentLogColumns) -> Result<Self> {
        let ids = require_column(df, &columns.id_column)?;
        let dates = require_column(df, &columns.date_column)?;

        let mut groups: BTreeMap<Ptid, Vec<AppointmentEntry>> = BTreeMap::new();
        for idx in 0..df.height() {
            let (Some(raw_id), Some(raw_date)) = (cell_text(ids, idx), cell_text(dates, idx))
            else {
                continue;
            };
            let collected = parse_datetime(&raw_date);
            if collected.is_none() {
                debug!(row = idx, value = %raw_date, "unparsable appointment date");
            }
            groups
                .entry(Ptid::normalize(&raw_id))
                .or_default()
                .push(AppointmentEntry {
                    raw: raw_date,
                    collected,
                });
        }
        Ok(Self { groups })
    }

    /// History for one participant; `NoHistory` when the log has no rows.
    pub fn history_for(&self, ptid: &Ptid) -> AppointmentHistory {
        match self.groups.get(ptid) {
            Some(entries) => AppointmentHistory::Recorded(entries.clone()),
            None => AppointmentHistory::NoHistory,
        }
    }

    /// Number of distinct participants in the log.
    pub fn participant_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Attaches appointment history to every participant and drops those with
/// `max_recent` or more appointments inside the trailing window.
///
/// Returns the filtered table and the number of removed rows.
pub fn join_appointments(
    table: ParticipantTable,
    log: &AppointmentLog,
    reference: &ReferenceInstant,
    window_weeks: u32,
    max_recent: usize,
) -> (ParticipantTable, usize) {
    let mut table = table;
    for record in table.records_mut() {
        record.appointments = log.history_for(&record.ptid);
        record.recent_appointment_count = record.appointments.recent_count(reference, window_weeks);
    }

    let before = table.len();
    let table = table.filter(|record| {
        let keep = record.recent_appointment_count < max_recent;
        if !keep {
            debug!(
                ptid = %record.ptid,
                recent = record.recent_appointment_count,
                "too many recent appointments"
            );
        }
        keep
    });
    let removed = before - table.len();
    (table, removed)
}
