//! Merging the two alternate participant identifier columns.

use haarvi_model::Ptid;
use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::frame::{PTID_COLUMN, cell_text, require_column, retain_rows};

/// Adds the normalized `ptid` column from the convalescent and control
/// identifier columns.
///
/// The convalescent identifier wins when both are filled. Rows with neither
/// are dropped. Returns the number of removed rows.
pub fn merge_identifiers(
    df: &mut DataFrame,
    convalescent_column: &str,
    control_column: &str,
) -> Result<usize> {
    let convalescent = require_column(df, convalescent_column)?;
    let control = require_column(df, control_column)?;

    let mut ptids: Vec<Option<String>> = Vec::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let raw = cell_text(convalescent, idx).or_else(|| cell_text(control, idx));
        let ptid = raw.map(|raw| Ptid::normalize(&raw));
        if ptid.is_none() {
            debug!(row = idx, "no participant identifier");
        }
        keep.push(ptid.is_some());
        ptids.push(ptid.map(|ptid| ptid.as_str().to_string()));
    }

    df.with_column(Series::new(PTID_COLUMN.into(), ptids))?;
    retain_rows(df, &keep, "has_ptid")
}
