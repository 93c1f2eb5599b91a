//! Trade signal records, raw and parsed.

use crate::domain::{Advisory, Decimal, SignalField};
use serde::{Deserialize, Serialize};

/// One bar of input exactly as read from the source, all fields as text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Bar identifier, e.g. a date. Not required to be unique.
    pub bar: String,
    pub close_px: String,
    pub trade_px: String,
    /// Signed target position: negative = short, positive = long, 0 = flat.
    pub position: String,
}

impl SignalRecord {
    pub fn new(
        bar: impl Into<String>,
        close_px: impl Into<String>,
        trade_px: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            bar: bar.into(),
            close_px: close_px.into(),
            trade_px: trade_px.into(),
            position: position.into(),
        }
    }
}

/// A parsed signal for one bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub bar: String,
    pub close_px: Decimal,
    pub trade_px: Decimal,
    pub target: i64,
}

impl Signal {
    /// Parse a raw record. Malformed numeric fields become zero and are
    /// reported as advisories.
    pub fn parse(record: &SignalRecord) -> (Signal, Vec<Advisory>) {
        let mut advisories = Vec::new();

        let mut decimal_field = |raw: &str, field: SignalField| {
            Decimal::from_str_canonical(raw.trim()).unwrap_or_else(|_| {
                advisories.push(Advisory::MalformedField {
                    bar: record.bar.clone(),
                    field,
                    raw: raw.to_string(),
                });
                Decimal::zero()
            })
        };
        let close_px = decimal_field(&record.close_px, SignalField::ClosePrice);
        let trade_px = decimal_field(&record.trade_px, SignalField::TradePrice);

        let target = record.position.trim().parse::<i64>().unwrap_or_else(|_| {
            advisories.push(Advisory::MalformedField {
                bar: record.bar.clone(),
                field: SignalField::Position,
                raw: record.position.clone(),
            });
            0
        });

        let signal = Signal {
            bar: record.bar.clone(),
            close_px,
            trade_px,
            target,
        };
        (signal, advisories)
    }
}
