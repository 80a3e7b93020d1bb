//! Participation-status filtering.

use haarvi_common::any_to_f64;
use haarvi_model::StatusFlag;
use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::frame::{cell_text, require_column, retain_rows};

/// Reads a status checkbox cell.
///
/// Raw exports hold `1`/`0`; label exports hold `Checked`/`Unchecked`.
/// Blank or unrecognized cells are `None`.
pub fn parse_flag(value: AnyValue<'_>) -> Option<bool> {
    if let Some(number) = any_to_f64(value.clone()) {
        return if number == 1.0 {
            Some(true)
        } else if number == 0.0 {
            Some(false)
        } else {
            None
        };
    }
    match value {
        AnyValue::String(s) => parse_label(s),
        AnyValue::StringOwned(s) => parse_label(&s),
        _ => None,
    }
}

fn parse_label(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "checked" => Some(true),
        "unchecked" => Some(false),
        _ => None,
    }
}

/// Drops rows whose status flags mark the participant inactive.
///
/// All eight status columns must be present. Each flag is evaluated for
/// every row and the exclusions are unioned, so a row excluded by several
/// flags is removed once. Returns the number of removed rows.
pub fn filter_status(df: &mut DataFrame, status_prefix: &str) -> Result<usize> {
    let mut columns = Vec::with_capacity(StatusFlag::ALL.len());
    for flag in StatusFlag::ALL {
        let name = flag.column_name(status_prefix);
        columns.push((flag, require_column(df, &name)?));
    }

    let mut keep = vec![true; df.height()];
    for (flag, column) in &columns {
        for (idx, keep_row) in keep.iter_mut().enumerate() {
            let value = parse_flag(column.get(idx).unwrap_or(AnyValue::Null));
            if value.is_none() && cell_text(column, idx).is_some() {
                debug!(row = idx, flag = %flag, "unrecognized status value");
            }
            if flag.excludes(value) {
                if *keep_row {
                    debug!(row = idx, reason = %flag, "excluded by status");
                }
                *keep_row = false;
            }
        }
    }

    retain_rows(df, &keep, "status_active")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "participant_status___";

    /// Builds a frame with one row per entry; each entry lists the checkbox
    /// values for flags 1 through 8.
    fn frame(rows: &[[&str; 8]]) -> DataFrame {
        let mut cols = vec![
            Series::new(
                "id".into(),
                (0..rows.len()).map(|i| format!("row{i}")).collect::<Vec<_>>(),
            )
            .into_column(),
        ];
        for flag in 0..8 {
            let values: Vec<String> = rows.iter().map(|row| row[flag].to_string()).collect();
            cols.push(Series::new(format!("{PREFIX}{}", flag + 1).into(), values).into_column());
        }
        DataFrame::new(cols).unwrap()
    }

    fn ids(df: &DataFrame) -> Vec<String> {
        let column = df.column("id").unwrap();
        (0..df.height())
            .map(|idx| cell_text(column, idx).unwrap_or_default())
            .collect()
    }

    #[test]
    fn removes_inactive_and_keeps_non_communicating() {
        let mut df = frame(&[
            ["1", "0", "0", "0", "0", "0", "0", "0"], // active
            ["0", "0", "0", "0", "0", "0", "0", "0"], // not active
            ["1", "1", "0", "0", "0", "0", "0", "0"], // opted out
            ["1", "0", "0", "0", "1", "0", "0", "0"], // non-communicating only
            ["1", "0", "0", "0", "0", "0", "1", "1"], // surveys only and deceased
            ["1", "0", "0", "0", "0", "1", "0", "0"], // opted out of draws
        ]);
        let removed = filter_status(&mut df, PREFIX).unwrap();
        assert_eq!(removed, 4);
        assert_eq!(ids(&df), vec!["row0", "row3"]);
    }

    #[test]
    fn blank_flags_never_exclude() {
        let mut df = frame(&[["", "", "", "", "", "", "", ""]]);
        assert_eq!(filter_status(&mut df, PREFIX).unwrap(), 0);
    }

    #[test]
    fn accepts_float_and_label_encodings() {
        let mut df = frame(&[
            ["1.0", "0.0", "0", "0", "0", "0", "0", "0"],
            ["Checked", "Unchecked", "", "", "", "", "", ""],
            ["Unchecked", "", "", "", "", "", "", ""],
        ]);
        filter_status(&mut df, PREFIX).unwrap();
        assert_eq!(ids(&df), vec!["row0", "row1"]);
    }

    #[test]
    fn missing_status_column_is_fatal() {
        let mut df = frame(&[["1", "0", "0", "0", "0", "0", "0", "0"]]);
        df.drop_in_place(&format!("{PREFIX}6")).unwrap();
        let result = filter_status(&mut df, PREFIX);
        match result {
            Err(crate::error::ScheduleError::MissingColumn { column, .. }) => {
                assert_eq!(column, format!("{PREFIX}6"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
