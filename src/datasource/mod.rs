//! Signal source abstraction for reading trade signal histories.

use crate::domain::SignalRecord;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod csv_file;
pub mod mock;

pub use csv_file::CsvFileSource;
pub use mock::MockSignalSource;

/// Source of a run's signal records.
///
/// Implementations return records in time order. Field values stay as text;
/// numeric parsing and its advisories belong to the caller.
#[async_trait]
pub trait SignalSource: Send + Sync + fmt::Debug {
    /// Human-readable origin used in logs, e.g. a file path.
    fn describe(&self) -> String;

    /// Fetch the full signal history.
    ///
    /// # Errors
    /// Returns an error if the history is unreadable or empty.
    async fn fetch_records(&self) -> Result<Vec<SignalRecord>, SignalSourceError>;
}

/// Error type for signal source operations.
#[derive(Debug, Error)]
pub enum SignalSourceError {
    /// The source could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The content is not valid delimited text.
    #[error("csv error in {path}: {message}")]
    Csv { path: String, message: String },
    /// The source holds no signal rows.
    #[error("no trade signals found in {0}")]
    Empty(String),
}
