//! Changing-amount record shared by the quantity, basis and cash-flow ledgers.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Start / added / removed / variance / end of an amount over one bar.
///
/// Invariants: `variance == added + removed` and `end == start + variance`.
/// `removed` carries its own sign; it is not subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub start: Decimal,
    pub added: Decimal,
    pub removed: Decimal,
    pub variance: Decimal,
    pub end: Decimal,
}

impl Tally {
    /// Close a bar's tally from the carried-in start and the bar's flows.
    /// `None` if the result leaves the decimal range.
    pub fn close(start: Decimal, added: Decimal, removed: Decimal) -> Option<Self> {
        let variance = added.checked_add(removed)?;
        Some(Self {
            start,
            added,
            removed,
            variance,
            end: start.checked_add(variance)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_close_applies_signed_flows() {
        let t = Tally::close(d("100"), d("25"), d("-40")).unwrap();
        assert_eq!(t.variance, d("-15"));
        assert_eq!(t.end, d("85"));
        assert_eq!(t.start, d("100"));
    }

    #[test]
    fn test_close_from_empty_start() {
        let t = Tally::close(Decimal::zero(), d("-10000"), Decimal::zero()).unwrap();
        assert_eq!(t.start, Decimal::zero());
        assert_eq!(t.removed, Decimal::zero());
        assert_eq!(t.end, d("-10000"));
    }
}
