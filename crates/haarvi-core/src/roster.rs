//! Materializes typed participant records from the cleaned export frame.

use std::collections::BTreeMap;

use haarvi_common::{any_to_date, any_to_i64};
use haarvi_model::{ExportColumns, ParticipantRecord, ParticipantTable, Ptid};
use polars::prelude::*;

use crate::error::Result;
use crate::frame::{AGE_COLUMN, PTID_COLUMN, cell_text, require_column};

/// Builds the participant table from a frame that has been through date
/// normalization, age validation, status filtering and identity merging.
///
/// `date_columns` are the event date columns normalization found in the
/// export; only they are carried onto the records.
pub fn build_roster(
    df: &DataFrame,
    columns: &ExportColumns,
    date_columns: &[String],
) -> Result<ParticipantTable> {
    let ptids = require_column(df, PTID_COLUMN)?;
    let ages = require_column(df, AGE_COLUMN)?;
    let global_ids = require_column(df, &columns.global_study_id)?;
    let emails = require_column(df, &columns.email)?;
    let dates = date_columns
        .iter()
        .map(|name| -> Result<(&str, &Column)> { Ok((name.as_str(), require_column(df, name)?)) })
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let (Some(ptid), Some(age)) = (
            cell_text(ptids, idx),
            any_to_i64(ages.get(idx).unwrap_or(AnyValue::Null)),
        ) else {
            continue;
        };
        let mut record = ParticipantRecord::new(Ptid::normalize(&ptid), age);
        record.global_study_id = cell_text(global_ids, idx);
        record.email = cell_text(emails, idx);
        record.event_dates = dates
            .iter()
            .map(|(name, column)| {
                let date = any_to_date(column.get(idx).unwrap_or(AnyValue::Null));
                ((*name).to_string(), date)
            })
            .collect::<BTreeMap<_, _>>();
        records.push(record);
    }

    Ok(ParticipantTable::new(date_columns.to_vec(), records))
}
