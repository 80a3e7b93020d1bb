//! Rows of the emitted follow-up schedule.

use crate::category::EligibilityKey;
use crate::ids::Ptid;
use crate::participant::AppointmentHistory;

/// One participant due for a follow-up appointment this month.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub global_study_id: Option<String>,
    pub ptid: Ptid,
    pub email: Option<String>,
    pub age: i64,
    pub appointments: AppointmentHistory,
    /// Never empty.
    pub eligible_appointments: Vec<EligibilityKey>,
}

impl ScheduleRow {
    /// Eligibility labels (`cov_vax_3m`, ...) in discovery order.
    pub fn labels(&self) -> Vec<String> {
        self.eligible_appointments
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Raw appointment-log dates in log order.
    pub fn appointment_dates(&self) -> Vec<&str> {
        self.appointments
            .entries()
            .iter()
            .map(|entry| entry.raw.as_str())
            .collect()
    }
}
