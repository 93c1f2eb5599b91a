//! Mock signal source for testing without files.

use super::{SignalSource, SignalSourceError};
use crate::domain::SignalRecord;
use async_trait::async_trait;

/// Mock signal source that returns predefined records.
#[derive(Debug, Clone, Default)]
pub struct MockSignalSource {
    records: Vec<SignalRecord>,
}

impl MockSignalSource {
    /// Create a new mock source with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record built from its four text fields.
    pub fn with_row(mut self, bar: &str, close_px: &str, trade_px: &str, position: &str) -> Self {
        self.records
            .push(SignalRecord::new(bar, close_px, trade_px, position));
        self
    }

    /// Add multiple records.
    pub fn with_records(mut self, records: Vec<SignalRecord>) -> Self {
        self.records.extend(records);
        self
    }
}

#[async_trait]
impl SignalSource for MockSignalSource {
    fn describe(&self) -> String {
        "mock".to_string()
    }

    async fn fetch_records(&self) -> Result<Vec<SignalRecord>, SignalSourceError> {
        if self.records.is_empty() {
            return Err(SignalSourceError::Empty(self.describe()));
        }
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_rows_in_order() {
        let source = MockSignalSource::new()
            .with_row("b0", "10", "10", "1")
            .with_row("b1", "11", "11", "0");
        let records = source.fetch_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bar, "b0");
        assert_eq!(records[1].bar, "b1");
    }

    #[tokio::test]
    async fn test_with_records_appends() {
        let source = MockSignalSource::new()
            .with_row("b0", "10", "10", "1")
            .with_records(vec![SignalRecord::new("b1", "9", "9", "-1")]);
        let records = source.fetch_records().await.unwrap();
        assert_eq!(records[1], SignalRecord::new("b1", "9", "9", "-1"));
    }

    #[tokio::test]
    async fn test_empty_mock_is_error() {
        let err = MockSignalSource::new().fetch_records().await.unwrap_err();
        assert!(matches!(err, SignalSourceError::Empty(_)));
    }
}
