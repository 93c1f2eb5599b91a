//! Non-fatal diagnostics raised while parsing signals or running a simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Combined ending position size above which an advisory is raised.
pub const IMPLAUSIBLE_SIZE: usize = 9999;

/// A non-fatal issue. The computation that raised it carried on unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A numeric field could not be parsed and was read as zero.
    MalformedField {
        bar: String,
        field: SignalField,
        raw: String,
    },
    /// Short plus long ending size exceeds [`IMPLAUSIBLE_SIZE`].
    ImplausibleSize { bar: String, size: usize },
}

/// Numeric columns of a signal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalField {
    ClosePrice,
    TradePrice,
    Position,
}

impl fmt::Display for SignalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalField::ClosePrice => write!(f, "close price"),
            SignalField::TradePrice => write!(f, "trade price"),
            SignalField::Position => write!(f, "position"),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MalformedField { bar, field, raw } => {
                write!(f, "bar {}: {} '{}' read as 0", bar, field, raw)
            }
            Advisory::ImplausibleSize { bar, size } => write!(
                f,
                "bar {}: position size {} is implausible; try a size below {} with a higher limit per position",
                bar,
                size,
                IMPLAUSIBLE_SIZE + 1
            ),
        }
    }
}
