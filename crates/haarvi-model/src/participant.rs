//! Participant rows and the table threaded through the pipeline.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::eligibility::Eligibility;
use crate::ids::Ptid;
use crate::reference::ReferenceInstant;

/// One historical appointment from the appointment log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentEntry {
    /// Cell text as it appeared in the log.
    pub raw: String,
    /// Parsed collection instant, `None` when the text is not a date.
    pub collected: Option<NaiveDateTime>,
}

/// Appointment history joined from the appointment log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AppointmentHistory {
    /// The log has no rows for this participant.
    #[default]
    NoHistory,
    /// Log rows for this participant, in log order.
    Recorded(Vec<AppointmentEntry>),
}

impl AppointmentHistory {
    pub fn entries(&self) -> &[AppointmentEntry] {
        match self {
            AppointmentHistory::NoHistory => &[],
            AppointmentHistory::Recorded(entries) => entries,
        }
    }

    /// Number of parsed appointments inside the trailing window.
    ///
    /// A participant without history has zero recent appointments; entries
    /// whose date could not be parsed are listed but never counted.
    pub fn recent_count(&self, reference: &ReferenceInstant, window_weeks: u32) -> usize {
        match self {
            AppointmentHistory::NoHistory => 0,
            AppointmentHistory::Recorded(entries) => entries
                .iter()
                .filter_map(|entry| entry.collected)
                .filter(|collected| reference.in_trailing_window(*collected, window_weeks))
                .count(),
        }
    }
}

/// A participant that survived cleaning and identity merging.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub global_study_id: Option<String>,
    pub ptid: Ptid,
    pub email: Option<String>,
    /// Whole years as of the reference instant.
    pub age: i64,
    /// Normalized event dates keyed by export column; `None` is a blank or
    /// unparsable cell. Only columns present in the export appear here.
    pub event_dates: BTreeMap<String, Option<NaiveDate>>,
    pub appointments: AppointmentHistory,
    pub recent_appointment_count: usize,
    pub eligibility: Eligibility,
}

impl ParticipantRecord {
    pub fn new(ptid: Ptid, age: i64) -> Self {
        Self {
            global_study_id: None,
            ptid,
            email: None,
            age,
            event_dates: BTreeMap::new(),
            appointments: AppointmentHistory::NoHistory,
            recent_appointment_count: 0,
            eligibility: Eligibility::new(),
        }
    }

    /// Most recent non-missing date across `columns`.
    ///
    /// Columns this record does not carry are skipped.
    pub fn most_recent_date<S: AsRef<str>>(&self, columns: &[S]) -> Option<NaiveDate> {
        columns
            .iter()
            .filter_map(|column| self.event_dates.get(column.as_ref()).copied().flatten())
            .max()
    }
}

/// The participant table: the date columns the export actually carried plus
/// the surviving rows, in export order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantTable {
    date_columns: Vec<String>,
    records: Vec<ParticipantRecord>,
}

impl ParticipantTable {
    pub fn new(date_columns: Vec<String>, records: Vec<ParticipantRecord>) -> Self {
        Self {
            date_columns,
            records,
        }
    }

    pub fn date_columns(&self) -> &[String] {
        &self.date_columns
    }

    pub fn has_date_column(&self, name: &str) -> bool {
        self.date_columns.iter().any(|column| column == name)
    }

    pub fn records(&self) -> &[ParticipantRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [ParticipantRecord] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<ParticipantRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keeps the rows matching `keep`, preserving order.
    pub fn filter<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&ParticipantRecord) -> bool,
    {
        let records = self.records.into_iter().filter(|record| keep(record)).collect();
        Self {
            date_columns: self.date_columns,
            records,
        }
    }
}
