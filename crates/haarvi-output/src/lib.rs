//! Writing the monthly follow-up schedule.
//!
//! The schedule is a single CSV file per month, named after the reference
//! month and year. Writing replaces any earlier file for the same month.

mod error;
mod schedule;

pub use error::{OutputError, Result};
pub use schedule::{
    LIST_SEPARATOR, ensure_parent_dir, schedule_headers, schedule_path, schedule_record,
    write_schedule, write_schedule_file,
};
