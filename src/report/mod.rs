//! Result table export.

use crate::engine::Snapshot;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Fractional digits printed for decimal columns.
const DECIMAL_PLACES: u32 = 6;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One output row. Position columns carry display signs: short sizes and
/// long exits negative, long sizes and short exits positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "Bar")]
    pub bar: String,
    #[serde(rename = "ClosePx")]
    pub close_px: String,
    #[serde(rename = "TradePx")]
    pub trade_px: String,
    #[serde(rename = "SHORT")]
    pub short: i128,
    #[serde(rename = "LONG")]
    pub long: i128,
    #[serde(rename = "Entry.S")]
    pub short_entry: i128,
    #[serde(rename = "Exit.S")]
    pub short_exit: i128,
    #[serde(rename = "Entry.L")]
    pub long_entry: i128,
    #[serde(rename = "Exit.L")]
    pub long_exit: i128,
    #[serde(rename = "Quantity.S")]
    pub short_quantity: String,
    #[serde(rename = "Quantity.L")]
    pub long_quantity: String,
    #[serde(rename = "Basis.S")]
    pub short_basis: String,
    #[serde(rename = "Basis.L")]
    pub long_basis: String,
    #[serde(rename = "Realized.S")]
    pub short_realized: String,
    #[serde(rename = "Realized.L")]
    pub long_realized: String,
    #[serde(rename = "Assets")]
    pub nav: String,
}

fn negative(size: usize) -> i128 {
    -(size as i128)
}

fn positive(size: usize) -> i128 {
    size as i128
}

impl ResultRow {
    pub fn from_snapshot(s: &Snapshot) -> Self {
        let fixed = |v: crate::domain::Decimal| v.to_fixed_string(DECIMAL_PLACES);
        Self {
            bar: s.bar.clone(),
            close_px: fixed(s.prices.close),
            trade_px: fixed(s.prices.trade),
            short: negative(s.short.position.ending),
            long: positive(s.long.position.ending),
            short_entry: negative(s.short.position.entered),
            short_exit: positive(s.short.position.exited),
            long_entry: positive(s.long.position.entered),
            long_exit: negative(s.long.position.exited),
            short_quantity: fixed(s.short.quantity.end),
            long_quantity: fixed(s.long.quantity.end),
            short_basis: fixed(s.short.basis.end),
            long_basis: fixed(s.long.basis.end),
            short_realized: fixed(s.short.returns.realized),
            long_realized: fixed(s.long.returns.realized),
            nav: fixed(s.risk.nav),
        }
    }
}

/// Encode snapshots as a CSV table with a title row.
pub fn encode_csv(snapshots: &[Snapshot]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for snapshot in snapshots {
        writer.serialize(ResultRow::from_snapshot(snapshot))?;
    }
    if snapshots.is_empty() {
        writer.write_record(HEADERS)?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))
}

/// Column titles in output order.
pub const HEADERS: [&str; 16] = [
    "Bar",
    "ClosePx",
    "TradePx",
    "SHORT",
    "LONG",
    "Entry.S",
    "Exit.S",
    "Entry.L",
    "Exit.L",
    "Quantity.S",
    "Quantity.L",
    "Basis.S",
    "Basis.L",
    "Realized.S",
    "Realized.L",
    "Assets",
];

/// Write the result table to `path`, creating or truncating it.
pub async fn write_report(path: &Path, snapshots: &[Snapshot]) -> Result<(), ReportError> {
    let bytes = encode_csv(snapshots)?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    tracing::info!("Results written to {}", path.display());
    Ok(())
}
