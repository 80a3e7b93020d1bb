//! Final projection to schedule rows.

use haarvi_model::{ParticipantTable, ScheduleRow};

/// Keeps participants with at least one due appointment, in table order.
pub fn select_schedule(table: ParticipantTable) -> Vec<ScheduleRow> {
    table
        .into_records()
        .into_iter()
        .filter(|record| !record.eligibility.is_empty())
        .map(|record| ScheduleRow {
            eligible_appointments: record.eligibility.appointments().to_vec(),
            global_study_id: record.global_study_id,
            ptid: record.ptid,
            email: record.email,
            age: record.age,
            appointments: record.appointments,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use haarvi_model::{EligibilityKey, EventCategory, Offset, ParticipantRecord, Ptid};

    #[test]
    fn drops_rows_without_eligibility_and_keeps_labels_verbatim() {
        let mut due = ParticipantRecord::new(Ptid::normalize("1a"), 45);
        due.eligibility.record(
            EligibilityKey::new(EventCategory::RsvVaccine, Offset::Months12),
            true,
        );
        due.eligibility.record(
            EligibilityKey::new(EventCategory::CovVaccine, Offset::Days30),
            true,
        );
        let mut not_due = ParticipantRecord::new(Ptid::normalize("2b"), 50);
        not_due.eligibility.record(
            EligibilityKey::new(EventCategory::CovVaccine, Offset::Months6),
            false,
        );

        let rows = select_schedule(ParticipantTable::new(vec![], vec![not_due, due]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ptid.as_str(), "00001A");
        assert_eq!(rows[0].labels(), vec!["rsv_vax_12m", "cov_vax_30d"]);
    }
}
