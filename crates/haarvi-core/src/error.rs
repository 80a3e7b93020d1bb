//! Error types for the eligibility pipeline.

use haarvi_ingest::IngestError;
use haarvi_model::ModelError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Fatal pipeline errors.
///
/// Row-level problems (bad dates, missing identifiers, excluded statuses)
/// never surface here; they remove the row or become a missing value.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A column the pipeline requires is absent from the input.
    #[error("required column '{column}' not found")]
    MissingColumn {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Config(#[from] ModelError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
