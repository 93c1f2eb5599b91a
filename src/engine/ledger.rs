//! Position, quantity, basis and cash-flow ledgers for one book.

use super::{BookState, LotQueue, SimulationError, SimulationParams, Tally};
use crate::domain::{Book, Decimal};
use crate::engine::lot_queue::Lot;
use serde::{Deserialize, Serialize};

/// Position size entered, exited and held at the end of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ioe {
    pub entered: usize,
    pub exited: usize,
    pub ending: usize,
}

impl Ioe {
    pub fn next(prev_ending: usize, entered: usize, exited: usize) -> Self {
        Self {
            entered,
            exited,
            ending: prev_ending + entered - exited,
        }
    }
}

/// Amounts added by newly opened lots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Opening {
    pub lots: Vec<Lot>,
    pub quantity: Decimal,
    pub cash_flow: Decimal,
    pub basis: Decimal,
}

/// Amounts removed by closing the oldest lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Closing {
    pub quantity: Decimal,
    pub basis: Decimal,
    pub cash_flow: Decimal,
}

/// Open `entered` lots of one unit each at the fee-adjusted entry price.
///
/// Each lot commits `limit` of cash: its quantity is `limit / unit_price`
/// and its basis is `limit`, both signed by book.
pub fn open_lots(
    book: Book,
    entered: usize,
    trade_px: Decimal,
    params: &SimulationParams,
    bar: &str,
) -> Result<Opening, SimulationError> {
    if entered == 0 {
        return Ok(Opening::default());
    }

    let unit_price = book.entry_price(trade_px, params.fee);
    if !unit_price.is_positive() {
        return Err(SimulationError::NonPositiveUnitPrice {
            bar: bar.to_string(),
            book,
            price: unit_price,
        });
    }
    let per_unit = params
        .limit
        .checked_div(unit_price)
        .ok_or_else(|| SimulationError::overflow(bar, "lot quantity"))?;

    let sign = Decimal::from(book.sign());
    let lot = Lot {
        quantity: sign * per_unit,
        cost: unit_price,
        basis: sign * params.limit,
    };

    let mut lots = Vec::new();
    lots.try_reserve_exact(entered)
        .map_err(|_| SimulationError::UnrepresentableSize {
            bar: bar.to_string(),
            book,
            size: entered,
        })?;
    lots.resize(entered, lot);

    let quantity = checked_total(lots.iter().map(|lot| lot.quantity))
        .ok_or_else(|| SimulationError::overflow(bar, "opened quantity"))?;
    let basis = checked_total(lots.iter().map(|lot| lot.basis))
        .ok_or_else(|| SimulationError::overflow(bar, "opened basis"))?;

    // Short entries receive cash, long entries spend it.
    Ok(Opening {
        lots,
        quantity,
        cash_flow: -basis,
        basis,
    })
}

/// Close the `exited` oldest lots of `queue` at the fee-adjusted exit price.
///
/// Removed quantity and basis are the negated sums over the closed lots.
pub fn close_lots(
    book: Book,
    exited: usize,
    trade_px: Decimal,
    fee: Decimal,
    queue: &mut LotQueue,
    bar: &str,
) -> Result<Closing, SimulationError> {
    if exited == 0 {
        return Ok(Closing::default());
    }

    let closed = queue.remove_oldest(exited);
    let quantity = -checked_total(closed.iter().map(|lot| lot.quantity))
        .ok_or_else(|| SimulationError::overflow(bar, "closed quantity"))?;
    let basis = -checked_total(closed.iter().map(|lot| lot.basis))
        .ok_or_else(|| SimulationError::overflow(bar, "closed basis"))?;

    // Covering a short spends cash, selling a long receives it.
    let sign = Decimal::from(book.sign());
    let cash_flow = (sign * quantity.abs())
        .checked_mul(book.exit_price(trade_px, fee))
        .ok_or_else(|| SimulationError::overflow(bar, "closing cash flow"))?;

    Ok(Closing {
        quantity,
        basis,
        cash_flow,
    })
}

/// Roll one book's ledgers forward by a bar.
///
/// The returned state has its quantity, basis and cash-flow tallies closed and
/// its queue updated; market value and returns are left for the returns
/// engine.
pub fn settle_book(
    book: Book,
    prev: &BookState,
    entered: usize,
    exited: usize,
    trade_px: Decimal,
    params: &SimulationParams,
    bar: &str,
) -> Result<BookState, SimulationError> {
    let opening = open_lots(book, entered, trade_px, params, bar)?;
    let position = Ioe::next(prev.position.ending, entered, exited);

    let mut queue = prev.queue.clone();
    let closing = close_lots(book, exited, trade_px, params.fee, &mut queue, bar)?;
    queue
        .append(opening.lots)
        .map_err(|_| SimulationError::UnrepresentableSize {
            bar: bar.to_string(),
            book,
            size: position.ending,
        })?;

    let tally = |start, added, removed, figure| {
        Tally::close(start, added, removed).ok_or_else(|| SimulationError::overflow(bar, figure))
    };

    Ok(BookState {
        position,
        quantity: tally(prev.quantity.end, opening.quantity, closing.quantity, "quantity")?,
        basis: tally(prev.basis.end, opening.basis, closing.basis, "basis")?,
        net_cash_flow: tally(
            prev.net_cash_flow.end,
            opening.cash_flow,
            closing.cash_flow,
            "net cash flow",
        )?,
        queue,
        ..BookState::default()
    })
}

fn checked_total(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::zero()), |acc, v| acc?.checked_add(v))
}
