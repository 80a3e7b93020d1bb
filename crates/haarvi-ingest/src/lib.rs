//! Input loading for the HAARVI follow-up scheduler.
//!
//! This crate finds the newest participant export in a directory and reads
//! CSV files (the export and the blood-draw appointment log) into Polars
//! DataFrames. Every column is read as text; assigning types is left to the
//! pipeline stages that understand each column.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use haarvi_ingest::{latest_export, read_csv_table};
//!
//! let export_dir = Path::new("exports");
//! let export = latest_export(export_dir, "HAARVIStudyRecords-TimelineCheck_DATA", &["haarvi_apts"])?;
//! let (df, headers) = read_csv_table(&export)?;
//! ```

mod csv;
mod discovery;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{CsvHeaders, read_csv_schema, read_csv_table};

// === File Discovery ===
pub use discovery::{latest_export, list_csv_files};
