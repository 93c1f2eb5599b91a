//! Mark-to-market valuation and trading returns.

use super::{BookState, SimulationError};
use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Returns of one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookReturns {
    /// Mark-to-market value less ending basis.
    pub unrealized: Decimal,
    /// Change of `unrealized` since the previous bar.
    pub unrealized_change: Decimal,
    /// Closing cash flow plus removed basis.
    pub realized: Decimal,
    /// `realized + unrealized`.
    pub total: Decimal,
}

/// Value a settled book at the close price and compute its returns.
pub fn mark_to_market(
    state: BookState,
    prev: &BookState,
    close_px: Decimal,
    bar: &str,
) -> Result<BookState, SimulationError> {
    let overflow = |figure| SimulationError::overflow(bar, figure);

    let market_value = state
        .quantity
        .end
        .checked_mul(close_px)
        .ok_or_else(|| overflow("market value"))?;
    let unrealized = market_value
        .checked_sub(state.basis.end)
        .ok_or_else(|| overflow("unrealized return"))?;
    let realized = state
        .net_cash_flow
        .removed
        .checked_add(state.basis.removed)
        .ok_or_else(|| overflow("realized return"))?;

    Ok(BookState {
        market_value,
        returns: BookReturns {
            unrealized,
            unrealized_change: unrealized
                .checked_sub(prev.returns.unrealized)
                .ok_or_else(|| overflow("unrealized change"))?,
            realized,
            total: realized
                .checked_add(unrealized)
                .ok_or_else(|| overflow("total return"))?,
        },
        ..state
    })
}

/// Cumulative return after a bar, given both books' returns for that bar.
///
/// Accumulates period gains, not totals, so earlier unrealized gains are not
/// counted twice. `None` if the sum leaves the decimal range.
pub fn cumulative_return(prev: Decimal, short: &BookReturns, long: &BookReturns) -> Option<Decimal> {
    [short, long].iter().try_fold(prev, |acc, returns| {
        acc.checked_add(returns.realized)?
            .checked_add(returns.unrealized_change)
    })
}
