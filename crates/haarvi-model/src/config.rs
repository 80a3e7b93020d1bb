//! Scheduler configuration.
//!
//! Every column name and constant the pipeline depends on lives here. The
//! `Default` implementation matches the HAARVI "Timeline Check" REDCap
//! export and the blood-draw appointment log; a JSON file can override any
//! part of it.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::{EventCategory, Offset};
use crate::error::{ModelError, Result};
use crate::reference::ReferenceInstant;
use crate::status::StatusFlag;

/// Column names in the participant export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportColumns {
    pub dob: String,
    pub global_study_id: String,
    pub email: String,
    pub convalescent_id: String,
    pub control_id: String,
    /// Prefix of the status checkbox columns; the checkbox number is appended.
    pub status_prefix: String,
}

impl Default for ExportColumns {
    fn default() -> Self {
        Self {
            dob: "dob".to_string(),
            global_study_id: "global_study_id".to_string(),
            email: "participant_email".to_string(),
            convalescent_id: "conv_partid".to_string(),
            control_id: "ctrl_partid".to_string(),
            status_prefix: "participant_status___".to_string(),
        }
    }
}

impl ExportColumns {
    pub fn status_column(&self, flag: StatusFlag) -> String {
        flag.column_name(&self.status_prefix)
    }
}

/// Column names in the appointment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentLogColumns {
    pub id_column: String,
    pub date_column: String,
}

impl Default for AppointmentLogColumns {
    fn default() -> Self {
        Self {
            id_column: "Patient_Study_ID".to_string(),
            date_column: "Date_Collected".to_string(),
        }
    }
}

/// Inclusive age range, in years, a participant must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeBounds {
    pub min_years: f64,
    pub max_years: f64,
}

impl Default for AgeBounds {
    fn default() -> Self {
        Self {
            min_years: 0.5,
            max_years: 120.0,
        }
    }
}

impl AgeBounds {
    pub fn contains(&self, age: i64) -> bool {
        let age = age as f64;
        age >= self.min_years && age <= self.max_years
    }
}

/// One event category: its date columns, in export order, and the offsets
/// checked against its most recent date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub category: EventCategory,
    pub columns: Vec<String>,
    pub offsets: Vec<Offset>,
}

impl CategoryConfig {
    pub fn new<S: Into<String>>(
        category: EventCategory,
        columns: impl IntoIterator<Item = S>,
        offsets: &[Offset],
    ) -> Self {
        Self {
            category,
            columns: columns.into_iter().map(Into::into).collect(),
            offsets: offsets.to_vec(),
        }
    }
}

/// Longest accepted trailing appointment window (ten years).
pub const MAX_WINDOW_WEEKS: u32 = 520;

/// Full configuration for one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub export: ExportColumns,
    /// Categories in processing order; eligibility labels accumulate in this order.
    pub categories: Vec<CategoryConfig>,
    pub appointment_log: AppointmentLogColumns,
    pub age_bounds: AgeBounds,
    /// Length of the trailing appointment window.
    pub recent_window_weeks: u32,
    /// Participants with this many recent appointments or more are skipped.
    pub max_recent_appointments: usize,
    /// Required file-name prefix of the participant export.
    pub export_file_prefix: String,
    /// File-name prefix of the emitted schedule.
    pub output_file_prefix: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let extended = Offset::ALL;
        let standard = Offset::STANDARD;
        Self {
            export: ExportColumns::default(),
            categories: vec![
                CategoryConfig::new(
                    EventCategory::CovVaccine,
                    (1..=12).map(|dose| format!("date_dose_{dose}")),
                    &standard,
                ),
                CategoryConfig::new(
                    EventCategory::CovInfection,
                    [
                        "test_date",
                        "test_date_cov2",
                        "test_date_cov3",
                        "test_date_4",
                        "test_date_5",
                    ],
                    &standard,
                ),
                CategoryConfig::new(
                    EventCategory::FluVaccine,
                    [
                        "flu_vax_date",
                        "flu_vax_date_2022_2023",
                        "flu_vax_date_23_24",
                        "flu_vax_date_24_25",
                        "flu_vax_date_y2526",
                    ],
                    &standard,
                ),
                CategoryConfig::new(
                    EventCategory::FluInfection,
                    ["test_date_flu_1", "test_date_flu_2"],
                    &standard,
                ),
                CategoryConfig::new(
                    EventCategory::RsvVaccine,
                    [
                        "rsv_vax_date_23_24",
                        "rsv_vax_date_24_25",
                        "rsv_vax_date_y2526",
                    ],
                    &extended,
                ),
                CategoryConfig::new(
                    EventCategory::RsvInfection,
                    ["test_date_rsv_1", "test_date_rsv2"],
                    &extended,
                ),
            ],
            appointment_log: AppointmentLogColumns::default(),
            age_bounds: AgeBounds::default(),
            recent_window_weeks: 8,
            max_recent_appointments: 2,
            export_file_prefix: "HAARVIStudyRecords-TimelineCheck_DATA".to_string(),
            output_file_prefix: "haarvi_apts".to_string(),
        }
    }
}

impl ScheduleConfig {
    /// Parses a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ScheduleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(ModelError::InvalidConfig(
                "at least one event category is required".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for category in &self.categories {
            if !seen.insert(category.category) {
                return Err(ModelError::InvalidConfig(format!(
                    "category {} is configured more than once",
                    category.category
                )));
            }
            if category.columns.is_empty() {
                return Err(ModelError::InvalidConfig(format!(
                    "category {} has no date columns",
                    category.category
                )));
            }
            if category.offsets.is_empty() {
                return Err(ModelError::InvalidConfig(format!(
                    "category {} has no offsets",
                    category.category
                )));
            }
        }
        if self.age_bounds.min_years > self.age_bounds.max_years {
            return Err(ModelError::InvalidConfig(format!(
                "age bounds are inverted ({} > {})",
                self.age_bounds.min_years, self.age_bounds.max_years
            )));
        }
        if self.recent_window_weeks == 0 || self.recent_window_weeks > MAX_WINDOW_WEEKS {
            return Err(ModelError::InvalidConfig(format!(
                "recent_window_weeks must be between 1 and {MAX_WINDOW_WEEKS}, got {}",
                self.recent_window_weeks
            )));
        }
        if self.max_recent_appointments == 0 {
            return Err(ModelError::InvalidConfig(
                "max_recent_appointments must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Every configured event date column, in category order, without duplicates.
    pub fn date_columns(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.categories
            .iter()
            .flat_map(|category| category.columns.iter())
            .filter(|column| seen.insert(column.as_str()))
            .cloned()
            .collect()
    }

    pub fn status_columns(&self) -> Vec<(StatusFlag, String)> {
        StatusFlag::ALL
            .into_iter()
            .map(|flag| (flag, self.export.status_column(flag)))
            .collect()
    }

    /// Schedule file name for the reference month, e.g. `haarvi_apts_4_2024.csv`.
    pub fn output_file_name(&self, reference: &ReferenceInstant) -> String {
        format!(
            "{}_{}_{}.csv",
            self.output_file_prefix,
            reference.month(),
            reference.year()
        )
    }
}
