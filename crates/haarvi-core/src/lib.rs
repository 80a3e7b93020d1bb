//! Eligibility pipeline for HAARVI follow-up blood-draw appointments.
//!
//! Given the participant export and the appointment log, the pipeline
//! decides which participants are due for a follow-up draw in the reference
//! month. See [`pipeline`] for the stage order.

pub mod age;
pub mod appointments;
pub mod dates;
pub mod error;
pub mod frame;
pub mod identity;
pub mod pipeline;
pub mod projection;
pub mod roster;
pub mod selection;
pub mod status;

pub use age::validate_ages;
pub use appointments::{AppointmentLog, join_appointments};
pub use dates::{normalize_dates, parse_date, parse_datetime};
pub use error::{Result, ScheduleError};
pub use frame::{AGE_COLUMN, PTID_COLUMN};
pub use identity::merge_identifiers;
pub use pipeline::{
    PipelineOutput, PipelineReport, Stage, StageReport, load_inputs, run_pipeline,
};
pub use projection::project_category;
pub use roster::build_roster;
pub use selection::select_schedule;
pub use status::{filter_status, parse_flag};
