//! Shared utilities for the HAARVI scheduling crates.
//!
//! This crate provides the Polars `AnyValue` conversions every stage uses to
//! read cells out of a participant export, regardless of the dtype the CSV
//! reader assigned to the column.

pub mod values;

pub use values::{
    any_to_date, any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, date_to_epoch_days,
    epoch_days_to_date, format_numeric, parse_f64, parse_i64,
};
