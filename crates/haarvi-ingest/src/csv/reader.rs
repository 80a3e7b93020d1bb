//! CSV file reading into all-text DataFrames.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, parse_csv_line};

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Reads the first line of a file with any UTF-8 BOM removed.
fn read_first_line(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    if read == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches(['\r', '\n']);
    let cleaned = line.strip_prefix('\u{feff}').unwrap_or(line);
    Ok(Some(cleaned.to_string()))
}

/// Reads the header row of a CSV file.
pub fn read_csv_schema(path: &Path) -> Result<CsvHeaders> {
    let Some(line) = read_first_line(path)? else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };

    let columns = parse_csv_line(&line);
    if columns.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }
    Ok(CsvHeaders::new(columns))
}

/// Reads a CSV file into a Polars DataFrame.
///
/// The first row is the header. Every column is read as a string column and
/// empty fields become nulls. Column names are taken from the parsed header,
/// so a UTF-8 BOM or padding around a name never leaks into the frame.
pub fn read_csv_table(path: &Path) -> Result<(DataFrame, CsvHeaders)> {
    let headers = read_csv_schema(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == headers.len() {
        df.set_column_names(headers.columns.iter().map(String::as_str))?;
    }

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read CSV"
    );

    Ok((df, headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_schema_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_schema(file.path());

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_schema_blank_header() {
        let file = create_temp_csv(",,\n1,2,3\n");
        let result = read_csv_schema(file.path());

        assert!(matches!(result, Err(IngestError::NoHeaderDetected { .. })));
    }

    #[test]
    fn test_read_csv_schema_with_bom() {
        let file = create_temp_csv("\u{feff}dob,conv_partid\r\n1980-01-01,12a\r\n");
        let headers = read_csv_schema(file.path()).unwrap();

        assert_eq!(headers.columns, vec!["dob", "conv_partid"]);
    }

    #[test]
    fn test_read_csv_table_reads_text_columns() {
        let file = create_temp_csv("conv_partid,participant_status___1,dob\n0012a,1,1980-01-01\n,0,\n");
        let (df, headers) = read_csv_table(file.path()).unwrap();

        assert_eq!(headers.columns, vec!["conv_partid", "participant_status___1", "dob"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        for column in df.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
        let ids = df.column("conv_partid").unwrap();
        assert_eq!(ids.get(0).unwrap(), AnyValue::String("0012a"));
        assert_eq!(ids.get(1).unwrap(), AnyValue::Null);
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_csv_table(&dir.path().join("absent.csv"));

        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
