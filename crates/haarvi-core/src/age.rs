//! Age derivation and range validation.

use haarvi_common::any_to_date;
use haarvi_model::{AgeBounds, ReferenceInstant};
use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::frame::{AGE_COLUMN, require_column, retain_rows};

/// Adds the `age` column and drops rows with an unusable age.
///
/// Age is whole years from the birthdate to the reference date. A row is
/// dropped when its birthdate is missing or when the age falls outside
/// `bounds`. Returns the number of removed rows.
pub fn validate_ages(
    df: &mut DataFrame,
    birth_column: &str,
    bounds: AgeBounds,
    reference: &ReferenceInstant,
) -> Result<usize> {
    let births = require_column(df, birth_column)?;

    let mut ages: Vec<Option<i64>> = Vec::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let age = any_to_date(births.get(idx).unwrap_or(AnyValue::Null))
            .map(|birth| reference.age_in_years(birth));
        match age {
            Some(age) if bounds.contains(age) => keep.push(true),
            Some(age) => {
                debug!(row = idx, age, "age outside allowed range");
                keep.push(false);
            }
            None => {
                debug!(row = idx, "missing or unparsable birthdate");
                keep.push(false);
            }
        }
        ages.push(age);
    }

    df.with_column(Series::new(AGE_COLUMN.into(), ages))?;
    retain_rows(df, &keep, "age_valid")
}
