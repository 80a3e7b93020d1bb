//! Domain model for the HAARVI follow-up appointment scheduler.
//!
//! The types here describe a participant as it moves through the eligibility
//! pipeline: the normalized identifier, the event categories and projection
//! offsets, the per-row eligibility bookkeeping and the run configuration.

pub mod category;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod ids;
pub mod participant;
pub mod reference;
pub mod schedule;
pub mod status;

pub use category::{EligibilityKey, EventCategory, Offset};
pub use config::{
    AgeBounds, AppointmentLogColumns, CategoryConfig, ExportColumns, MAX_WINDOW_WEEKS, ScheduleConfig,
};
pub use eligibility::Eligibility;
pub use error::{ModelError, Result};
pub use ids::Ptid;
pub use participant::{AppointmentEntry, AppointmentHistory, ParticipantRecord, ParticipantTable};
pub use reference::ReferenceInstant;
pub use schedule::ScheduleRow;
pub use status::{StatusFlag, StatusRule};
