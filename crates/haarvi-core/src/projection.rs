//! Projecting each category's most recent event forward to find due follow-ups.

use haarvi_model::{EligibilityKey, EventCategory, Offset, ParticipantTable, ReferenceInstant};
use tracing::{debug, warn};

/// Evaluates one category for every participant.
///
/// For each row the most recent date across `columns` is projected forward
/// by every offset; a projection landing in the reference month makes the
/// row eligible for `{category}_{offset}`. Rows with no dates in the category
/// are skipped, and configured columns missing from the export are ignored.
/// Running the same category twice never duplicates a label. Returns the
/// number of labels added.
pub fn project_category(
    table: &mut ParticipantTable,
    category: EventCategory,
    columns: &[String],
    offsets: &[Offset],
    reference: &ReferenceInstant,
) -> usize {
    let present: Vec<&String> = columns
        .iter()
        .filter(|column| table.has_date_column(column))
        .collect();
    if present.len() < columns.len() {
        warn!(
            category = %category,
            missing = columns.len() - present.len(),
            "category columns missing from export"
        );
    }

    let mut added = 0;
    for record in table.records_mut() {
        let Some(latest) = record.most_recent_date(&present) else {
            continue;
        };
        for &offset in offsets {
            let key = EligibilityKey::new(category, offset);
            let eligible = offset
                .project(latest)
                .is_some_and(|projected| reference.is_current_month(projected));
            if record.eligibility.record(key, eligible) {
                debug!(ptid = %record.ptid, label = %key, "eligible");
                added += 1;
            }
        }
    }
    added
}
