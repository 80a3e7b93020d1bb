//! DataFrame helpers shared by the row-filtering stages.

use haarvi_common::any_to_string_non_empty;
use polars::prelude::*;

use crate::error::{Result, ScheduleError};

/// Canonical participant identifier column added by identity merging.
pub const PTID_COLUMN: &str = "ptid";

/// Derived age column added by age validation.
pub const AGE_COLUMN: &str = "age";

/// Returns a column or a `MissingColumn` error naming it.
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|source| ScheduleError::MissingColumn {
        column: name.to_string(),
        source,
    })
}

/// Trimmed, non-blank cell text.
pub fn cell_text(column: &Column, idx: usize) -> Option<String> {
    any_to_string_non_empty(column.get(idx).unwrap_or(AnyValue::Null))
}

/// Keeps the rows whose `keep` entry is true and returns how many were removed.
///
/// Callers evaluate every row first and drop the whole batch at once, so row
/// order is preserved and a row flagged for several reasons is removed once.
pub fn retain_rows(df: &mut DataFrame, keep: &[bool], name: &str) -> Result<usize> {
    let before = df.height();
    let mask = BooleanChunked::from_slice(name.into(), keep);
    *df = df.filter(&mask)?;
    Ok(before - df.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_rows_preserves_order() {
        let mut df = DataFrame::new(vec![
            Series::new("id".into(), vec!["a", "b", "c", "d"]).into_column(),
        ])
        .unwrap();
        let removed = retain_rows(&mut df, &[true, false, true, false], "keep").unwrap();
        assert_eq!(removed, 2);
        let ids = df.column("id").unwrap();
        assert_eq!(cell_text(ids, 0).as_deref(), Some("a"));
        assert_eq!(cell_text(ids, 1).as_deref(), Some("c"));
    }

    #[test]
    fn missing_column_names_the_column() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec!["a"]).into_column(),
        ])
        .unwrap();
        match require_column(&df, "dob") {
            Err(ScheduleError::MissingColumn { column, .. }) => assert_eq!(column, "dob"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn blank_cells_read_as_none() {
        let column = Series::new("x".into(), vec![Some("  "), None, Some(" v ")]).into_column();
        assert_eq!(cell_text(&column, 0), None);
        assert_eq!(cell_text(&column, 1), None);
        assert_eq!(cell_text(&column, 2).as_deref(), Some("v"));
    }
}
