//! Event categories, projection offsets and the eligibility key built from them.
//!
//! Each category groups the export's date columns for one kind of event
//! (an infection or a vaccine dose). A participant is due for a follow-up
//! when the most recent event in a category, projected forward by one of
//! the category's offsets, lands in the current calendar month.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One of the six event groupings tracked by the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    #[serde(rename = "cov_inf")]
    CovInfection,
    #[serde(rename = "cov_vax")]
    CovVaccine,
    #[serde(rename = "flu_inf")]
    FluInfection,
    #[serde(rename = "flu_vax")]
    FluVaccine,
    #[serde(rename = "rsv_inf")]
    RsvInfection,
    #[serde(rename = "rsv_vax")]
    RsvVaccine,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::CovInfection,
        EventCategory::CovVaccine,
        EventCategory::FluInfection,
        EventCategory::FluVaccine,
        EventCategory::RsvInfection,
        EventCategory::RsvVaccine,
    ];

    /// Short label used in eligibility names (`cov_vax`, `rsv_inf`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::CovInfection => "cov_inf",
            EventCategory::CovVaccine => "cov_vax",
            EventCategory::FluInfection => "flu_inf",
            EventCategory::FluVaccine => "flu_vax",
            EventCategory::RsvInfection => "rsv_inf",
            EventCategory::RsvVaccine => "rsv_vax",
        }
    }

    /// Human-readable description for summaries.
    pub fn description(&self) -> &'static str {
        match self {
            EventCategory::CovInfection => "COVID-19 infection",
            EventCategory::CovVaccine => "COVID-19 vaccine",
            EventCategory::FluInfection => "Influenza infection",
            EventCategory::FluVaccine => "Influenza vaccine",
            EventCategory::RsvInfection => "RSV infection",
            EventCategory::RsvVaccine => "RSV vaccine",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        EventCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}

/// A forward projection applied to a category's most recent event date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Offset {
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "3m")]
    Months3,
    #[serde(rename = "6m")]
    Months6,
    #[serde(rename = "12m")]
    Months12,
    #[serde(rename = "18m")]
    Months18,
    #[serde(rename = "24m")]
    Months24,
}

impl Offset {
    pub const ALL: [Offset; 6] = [
        Offset::Days30,
        Offset::Months3,
        Offset::Months6,
        Offset::Months12,
        Offset::Months18,
        Offset::Months24,
    ];

    /// Offsets checked for infection and vaccine categories.
    pub const STANDARD: [Offset; 3] = [Offset::Days30, Offset::Months3, Offset::Months6];

    pub fn as_str(&self) -> &'static str {
        match self {
            Offset::Days30 => "30d",
            Offset::Months3 => "3m",
            Offset::Months6 => "6m",
            Offset::Months12 => "12m",
            Offset::Months18 => "18m",
            Offset::Months24 => "24m",
        }
    }

    /// Projects `date` forward by this offset.
    ///
    /// Day offsets add calendar days. Month offsets add calendar months and
    /// keep the day of month, clamping to the last day of a shorter month
    /// (2024-01-31 + 3m = 2024-04-30). Returns `None` only when the result
    /// falls outside the representable date range.
    pub fn project(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Offset::Days30 => date.checked_add_days(Days::new(30)),
            Offset::Months3 => date.checked_add_months(Months::new(3)),
            Offset::Months6 => date.checked_add_months(Months::new(6)),
            Offset::Months12 => date.checked_add_months(Months::new(12)),
            Offset::Months18 => date.checked_add_months(Months::new(18)),
            Offset::Months24 => date.checked_add_months(Months::new(24)),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Offset {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Offset::ALL
            .into_iter()
            .find(|offset| offset.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownOffset(s.to_string()))
    }
}

/// A (category, offset) pair; displays as `{category}_{offset}`, e.g. `cov_vax_3m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EligibilityKey {
    pub category: EventCategory,
    pub offset: Offset,
}

impl EligibilityKey {
    pub fn new(category: EventCategory, offset: Offset) -> Self {
        Self { category, offset }
    }
}

impl fmt::Display for EligibilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category, self.offset)
    }
}

impl FromStr for EligibilityKey {
    type Err = ModelError;

    /// Parses `cov_vax_3m` style labels. The category label itself contains
    /// an underscore, so the split happens at the last one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (category, offset) = trimmed
            .rsplit_once('_')
            .ok_or_else(|| ModelError::UnknownCategory(trimmed.to_string()))?;
        Ok(Self::new(category.parse()?, offset.parse()?))
    }
}
