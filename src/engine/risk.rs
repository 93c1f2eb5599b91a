//! NAV, peak NAV, drawdown and trade counters.

use crate::domain::Decimal;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};

/// Drawdowns at or below this fraction of the cash base are reported as zero.
pub const DRAWDOWN_SIGNIFICANCE: Decimal = Decimal::new(RustDecimal::from_parts(1, 0, 0, false, 4));

/// Whole-asset risk figures at the end of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskState {
    pub nav: Decimal,
    pub peak_nav: Decimal,
    pub drawdown: Decimal,
    pub worst_drawdown: Decimal,
    pub entries: u64,
    pub exits: u64,
}

impl RiskState {
    /// State of the first bar: NAV equals the cash base and nothing has been
    /// counted yet.
    pub fn bootstrap(cash_base: Decimal) -> Self {
        Self {
            nav: cash_base,
            peak_nav: cash_base,
            ..Self::default()
        }
    }

    /// Roll risk figures forward to a bar with the given cumulative return.
    /// `None` if NAV or the decline from peak leaves the decimal range.
    pub fn next(
        &self,
        cash_base: Decimal,
        cumulative_return: Decimal,
        entered: bool,
        exited: bool,
    ) -> Option<Self> {
        let nav = cash_base.checked_add(cumulative_return)?;
        let peak_nav = self.peak_nav.max(nav);
        let drawdown = drawdown(peak_nav, nav, cash_base)?;

        Some(Self {
            nav,
            peak_nav,
            drawdown,
            worst_drawdown: self.worst_drawdown.max(drawdown),
            entries: self.entries + u64::from(entered),
            exits: self.exits + u64::from(exited),
        })
    }
}

/// Peak-to-current decline as a fraction of the cash base, with noise below
/// [`DRAWDOWN_SIGNIFICANCE`] suppressed to zero.
pub fn drawdown(peak_nav: Decimal, nav: Decimal, cash_base: Decimal) -> Option<Decimal> {
    let decline = peak_nav.checked_sub(nav)?;
    Some(match decline.checked_div(cash_base) {
        Some(dd) if dd > DRAWDOWN_SIGNIFICANCE => dd,
        _ => Decimal::zero(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_significance_constant() {
        assert_eq!(DRAWDOWN_SIGNIFICANCE, d("0.0001"));
    }

    #[test]
    fn test_drawdown_noise_floor() {
        let cash = d("100000");
        // 0.00005 of the cash base below peak.
        assert_eq!(drawdown(cash, cash - d("5"), cash), Some(Decimal::zero()));
        // Exactly at the threshold is still noise.
        assert_eq!(drawdown(cash, cash - d("10"), cash), Some(Decimal::zero()));
        assert_eq!(drawdown(cash, cash - d("20"), cash), Some(d("0.0002")));
    }

    #[test]
    fn test_next_tracks_peak_and_worst() {
        let cash = d("1000");
        let start = RiskState::bootstrap(cash);
        assert_eq!(start.nav, cash);
        assert_eq!(start.entries, 0);

        let up = start.next(cash, d("100"), false, false).unwrap();
        assert_eq!(up.nav, d("1100"));
        assert_eq!(up.peak_nav, d("1100"));
        assert_eq!(up.drawdown, Decimal::zero());

        let down = up.next(cash, d("-100"), false, true).unwrap();
        assert_eq!(down.peak_nav, d("1100"));
        assert_eq!(down.drawdown, d("0.2"));
        assert_eq!(down.worst_drawdown, d("0.2"));
        assert_eq!(down.exits, 1);

        let recover = down.next(cash, d("50"), true, true).unwrap();
        assert_eq!(recover.drawdown, d("0.05"));
        assert_eq!(recover.worst_drawdown, d("0.2"));
        assert_eq!(recover.entries, 1);
        assert_eq!(recover.exits, 2);
    }

    #[test]
    fn test_next_out_of_range() {
        let max = Decimal::new(RustDecimal::MAX);
        let start = RiskState::bootstrap(max);
        assert_eq!(start.next(max, d("1"), false, false), None);
    }
}
