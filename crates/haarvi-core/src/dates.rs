//! Date parsing and the date normalization stage.
//!
//! REDCap exports dates as text, and the format depends on how the project
//! was configured and whether a coordinator edited the CSV by hand. Each
//! configured date column is converted to a Polars `Date` column in one
//! pass; cells that do not parse become null rather than failing the run.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use haarvi_common::date_to_epoch_days;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::Result;
use crate::frame::{cell_text, require_column};

const DATETIME_FORMATS: [&str; 13] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
];

// `%Y` also accepts one- and two-digit years, so every two-digit-year form
// must come before the four-digit forms sharing its separator.
const DATE_FORMATS: [&str; 10] = [
    "%m/%d/%y",
    "%m-%d-%y",
    "%d-%b-%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Earliest year accepted from a parsed cell.
const MIN_YEAR: i32 = 1000;

fn parse_date_with(text: &str, fmt: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, fmt)
        .ok()
        .filter(|date| date.year() >= MIN_YEAR)
}

fn parse_datetime_with(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, fmt)
        .ok()
        .filter(|dt| dt.year() >= MIN_YEAR)
}

/// Parses a date or datetime cell, keeping the date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| parse_date_with(trimmed, fmt))
        .or_else(|| parse_datetime(trimmed).map(|dt| dt.date()))
}

/// Parses a datetime cell; a bare date is taken as midnight.
///
/// A trailing `Z` or UTC offset is dropped and the wall-clock time kept.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(zoned) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(zoned.naive_local()).filter(|dt| dt.year() >= MIN_YEAR);
    }
    let local = trimmed
        .strip_suffix(['Z', 'z'])
        .map_or(trimmed, str::trim_end);
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| parse_datetime_with(local, fmt))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| parse_date_with(local, fmt))
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
}

/// Converts the birthdate column and every present event date column to
/// `Date` columns.
///
/// The birthdate column is required. Event date columns absent from the
/// export are skipped with a warning; the returned list names the event
/// columns that were converted, in configuration order.
pub fn normalize_dates(
    df: &mut DataFrame,
    birth_column: &str,
    date_columns: &[String],
) -> Result<Vec<String>> {
    require_column(df, birth_column)?;
    convert_date_column(df, birth_column)?;

    let mut present = Vec::with_capacity(date_columns.len());
    for name in date_columns {
        if name == birth_column {
            continue;
        }
        if df.column(name).is_err() {
            warn!(column = %name, "configured date column not in export, skipping");
            continue;
        }
        convert_date_column(df, name)?;
        present.push(name.clone());
    }
    Ok(present)
}

fn convert_date_column(df: &mut DataFrame, name: &str) -> Result<()> {
    let column = require_column(df, name)?;
    if column.dtype() == &DataType::Date {
        return Ok(());
    }

    let mut unparsed = 0usize;
    let mut values: Vec<Option<i32>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let parsed = match cell_text(column, idx) {
            Some(text) => {
                let date = parse_date(&text);
                if date.is_none() {
                    unparsed += 1;
                }
                date
            }
            None => None,
        };
        values.push(parsed.map(date_to_epoch_days));
    }
    if unparsed > 0 {
        debug!(column = %name, unparsed, "unparsable dates set to missing");
    }

    let series = Series::new(name.into(), values).cast(&DataType::Date)?;
    df.with_column(series)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use haarvi_common::any_to_date;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn frame(columns: &[(&str, Vec<Option<&str>>)]) -> DataFrame {
        let cols = columns
            .iter()
            .map(|(name, values)| Series::new((*name).into(), values.clone()).into_column())
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn parses_common_export_formats() {
        let expected = date(2024, 1, 5);
        for text in [
            "2024-01-05",
            "2024/01/05",
            "01/05/2024",
            "1/5/2024",
            "01/05/24",
            "01-05-2024",
            "05-Jan-2024",
            "Jan 05, 2024",
            "January 5, 2024",
            "2024-01-05 13:45",
            "2024-01-05T13:45:10",
            "2024-01-05T13:45:10.250",
            "01/05/2024 08:30",
            "01-05-24",
            "05-Jan-24",
            "1/5/2024 8:30 AM",
            "01/05/24 08:30",
            "2024-01-05 00:00:00.000",
            "2024-01-05T13:45:10Z",
        ] {
            assert_eq!(parse_date(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn two_digit_years_are_not_read_as_early_centuries() {
        assert_eq!(parse_date("04/10/79"), Some(date(1979, 4, 10)));
        assert_eq!(parse_date("1/5/24"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("03-01-24"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date("0024-01-05"), None);
        assert_eq!(
            parse_datetime("3/1/24 14:30"),
            Some(date(2024, 3, 1).and_hms_opt(14, 30, 0).unwrap())
        );
    }

    #[test]
    fn parses_twelve_hour_and_zoned_timestamps() {
        let at = |h, m, s| date(2024, 1, 5).and_hms_opt(h, m, s).unwrap();
        assert_eq!(parse_datetime("1/5/2024 8:30 AM"), Some(at(8, 30, 0)));
        assert_eq!(parse_datetime("01/05/2024 08:30:15 PM"), Some(at(20, 30, 15)));
        assert_eq!(parse_datetime("1/5/24 12:05 pm"), Some(at(12, 5, 0)));
        assert_eq!(
            parse_datetime("2024-01-05 00:00:00.000"),
            Some(at(0, 0, 0))
        );
        assert_eq!(parse_datetime("2024-01-05T13:45:10Z"), Some(at(13, 45, 10)));
        assert_eq!(parse_datetime("2024-01-05 13:45:10Z"), Some(at(13, 45, 10)));
        assert_eq!(
            parse_datetime("2024-01-05T13:45:10.5-08:00"),
            date(2024, 1, 5).and_hms_milli_opt(13, 45, 10, 500)
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("unknown"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("13/01/2024"), None);
    }

    #[test]
    fn datetime_keeps_time_of_day() {
        let parsed = parse_datetime("2024-03-01 14:30").unwrap();
        assert_eq!(parsed, date(2024, 3, 1).and_hms_opt(14, 30, 0).unwrap());
        let midnight = parse_datetime("03/01/2024").unwrap();
        assert_eq!(midnight, date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn converts_columns_and_nulls_unparsable_cells() {
        let mut df = frame(&[
            ("dob", vec![Some("1979-04-10"), Some("n/a"), None]),
            ("date_dose_1", vec![Some("01/05/2024"), Some("soon"), Some("")]),
        ]);
        let present = normalize_dates(
            &mut df,
            "dob",
            &["date_dose_1".to_string(), "date_dose_2".to_string()],
        )
        .unwrap();

        assert_eq!(present, vec!["date_dose_1".to_string()]);
        let dob = df.column("dob").unwrap();
        assert_eq!(dob.dtype(), &DataType::Date);
        assert_eq!(any_to_date(dob.get(0).unwrap()), Some(date(1979, 4, 10)));
        assert_eq!(dob.get(1).unwrap(), AnyValue::Null);
        let dose = df.column("date_dose_1").unwrap();
        assert_eq!(dose.dtype(), &DataType::Date);
        assert_eq!(any_to_date(dose.get(0).unwrap()), Some(date(2024, 1, 5)));
        assert_eq!(dose.null_count(), 2);
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn missing_birthdate_column_is_fatal() {
        let mut df = frame(&[("date_dose_1", vec![Some("2024-01-05")])]);
        let result = normalize_dates(&mut df, "dob", &[]);
        assert!(matches!(
            result,
            Err(crate::error::ScheduleError::MissingColumn { .. })
        ));
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let mut df = frame(&[("dob", vec![Some("1979-04-10")])]);
        normalize_dates(&mut df, "dob", &[]).unwrap();
        normalize_dates(&mut df, "dob", &[]).unwrap();
        let dob = df.column("dob").unwrap();
        assert_eq!(any_to_date(dob.get(0).unwrap()), Some(date(1979, 4, 10)));
    }
}
