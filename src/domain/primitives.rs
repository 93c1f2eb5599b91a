//! Domain primitives: Book, Sign.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// One side of the instrument. Each book is accounted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Book {
    /// Sold to open; negative quantity, negative basis.
    Short,
    /// Bought to open; positive quantity, positive basis.
    Long,
}

impl Book {
    /// Get the signed multiplier for this book (-1 for Short, +1 for Long).
    pub fn sign(&self) -> i64 {
        match self {
            Book::Short => -1,
            Book::Long => 1,
        }
    }

    /// Fee-adjusted price per unit when opening a lot.
    ///
    /// Selling short receives the trade price less the fee; buying long pays
    /// the trade price plus the fee.
    pub fn entry_price(&self, trade_px: Decimal, fee: Decimal) -> Decimal {
        match self {
            Book::Short => trade_px - fee,
            Book::Long => trade_px + fee,
        }
    }

    /// Fee-adjusted price per unit when closing a lot.
    pub fn exit_price(&self, trade_px: Decimal, fee: Decimal) -> Decimal {
        match self {
            Book::Short => trade_px + fee,
            Book::Long => trade_px - fee,
        }
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Book::Short => write!(f, "short"),
            Book::Long => write!(f, "long"),
        }
    }
}

/// Sign of a raw signed position signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn of(value: i64) -> Self {
        match value.signum() {
            -1 => Sign::Negative,
            1 => Sign::Positive,
            _ => Sign::Zero,
        }
    }
}
