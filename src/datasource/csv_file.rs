//! Reading signal histories from delimited text files.

use super::{SignalSource, SignalSourceError};
use crate::domain::SignalRecord;
use async_trait::async_trait;
use std::path::PathBuf;

/// Signal file with columns: bar, close price, trade price, signed position.
///
/// Extra columns are ignored; missing columns read as empty text.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    headers: bool,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>, headers: bool) -> Self {
        Self {
            path: path.into(),
            headers,
        }
    }

    /// Parse signal rows from raw bytes. When `headers` is set the first row
    /// is treated as column titles and skipped.
    pub fn parse_csv(
        csv_bytes: &[u8],
        headers: bool,
        origin: &str,
    ) -> Result<Vec<SignalRecord>, SignalSourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(headers)
            .flexible(true)
            .from_reader(csv_bytes);

        if headers {
            let titles = reader.headers().map_err(|e| SignalSourceError::Csv {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
            tracing::debug!("Skipping column titles in {}: {:?}", origin, titles);
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| SignalSourceError::Csv {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
            let field = |i: usize| row.get(i).unwrap_or_default().to_string();
            records.push(SignalRecord {
                bar: field(0),
                close_px: field(1),
                trade_px: field(2),
                position: field(3),
            });
        }

        if records.is_empty() {
            return Err(SignalSourceError::Empty(origin.to_string()));
        }
        tracing::debug!("First data row in {}: {:?}", origin, records[0]);

        Ok(records)
    }
}

#[async_trait]
impl SignalSource for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_records(&self) -> Result<Vec<SignalRecord>, SignalSourceError> {
        let origin = self.describe();
        tracing::info!("Reading trade signals from {}", origin);

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SignalSourceError::Io {
                path: origin.clone(),
                source,
            })?;

        Self::parse_csv(&bytes, self.headers, &origin)
    }
}
