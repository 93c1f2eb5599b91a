use super::ledger::settle_book;
use super::returns::{cumulative_return, mark_to_market};
use super::signal_interpreter::{interpret, PositionDeltas};
use super::{Prices, RiskState, SimulationParams, Snapshot};
use crate::domain::advisory::IMPLAUSIBLE_SIZE;
use crate::domain::{Advisory, Book, Decimal, Signal};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("bar {bar}: fee-adjusted {book} entry price {price} is not positive")]
    NonPositiveUnitPrice {
        bar: String,
        book: Book,
        price: Decimal,
    },
    #[error("bar {bar}: a {book} position of {size} lots cannot be held in memory")]
    UnrepresentableSize { bar: String, book: Book, size: usize },
    #[error("bar {bar}: {figure} is outside the decimal range")]
    Overflow { bar: String, figure: &'static str },
}

impl SimulationError {
    pub(crate) fn overflow(bar: &str, figure: &'static str) -> Self {
        SimulationError::Overflow {
            bar: bar.to_string(),
            figure,
        }
    }
}

/// Ordered snapshots of a run plus the advisories raised along the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Simulation {
    pub snapshots: Vec<Snapshot>,
    pub advisories: Vec<Advisory>,
}

/// Compute the first bar from its signal alone.
///
/// Both books start empty; lots are opened for the signal's book, nothing is
/// closed and no returns are computed. NAV is the cash base and the entry
/// counter starts at zero.
pub fn bootstrap(
    signal: &Signal,
    params: &SimulationParams,
) -> Result<(Snapshot, Vec<Advisory>), SimulationError> {
    let deltas = PositionDeltas::bootstrap(signal.target);
    let empty = Default::default();

    let short = settle_book(
        Book::Short,
        &empty,
        deltas.short_in,
        0,
        signal.trade_px,
        params,
        &signal.bar,
    )?;
    let long = settle_book(
        Book::Long,
        &empty,
        deltas.long_in,
        0,
        signal.trade_px,
        params,
        &signal.bar,
    )?;

    let snapshot = Snapshot {
        bar: signal.bar.clone(),
        prices: Prices {
            close: signal.close_px,
            trade: signal.trade_px,
        },
        transition: None,
        short,
        long,
        cumulative_return: Decimal::zero(),
        risk: RiskState::bootstrap(params.cash_base),
        exit_blocked: false,
    };
    let advisories = size_advisory(&snapshot).into_iter().collect();
    Ok((snapshot, advisories))
}

/// Compute bar `t` from bar `t-1` and bar `t`'s signal.
pub fn step(
    prev: &Snapshot,
    signal: &Signal,
    params: &SimulationParams,
) -> Result<(Snapshot, Vec<Advisory>), SimulationError> {
    let (transition, deltas) = interpret(
        signal.target,
        prev.short.position.ending,
        prev.long.position.ending,
    );

    let short = settle_book(
        Book::Short,
        &prev.short,
        deltas.short_in,
        deltas.short_out,
        signal.trade_px,
        params,
        &signal.bar,
    )?;
    let long = settle_book(
        Book::Long,
        &prev.long,
        deltas.long_in,
        deltas.long_out,
        signal.trade_px,
        params,
        &signal.bar,
    )?;

    let short = mark_to_market(short, &prev.short, signal.close_px, &signal.bar)?;
    let long = mark_to_market(long, &prev.long, signal.close_px, &signal.bar)?;
    let cumulative_return =
        cumulative_return(prev.cumulative_return, &short.returns, &long.returns)
            .ok_or_else(|| SimulationError::overflow(&signal.bar, "cumulative return"))?;

    let risk = prev
        .risk
        .next(
            params.cash_base,
            cumulative_return,
            deltas.has_entry(),
            deltas.has_exit(),
        )
        .ok_or_else(|| SimulationError::overflow(&signal.bar, "net asset value"))?;

    let snapshot = Snapshot {
        bar: signal.bar.clone(),
        prices: Prices {
            close: signal.close_px,
            trade: signal.trade_px,
        },
        transition: Some(transition),
        short,
        long,
        cumulative_return,
        risk,
        exit_blocked: false,
    };
    let advisories = size_advisory(&snapshot).into_iter().collect();
    Ok((snapshot, advisories))
}

fn size_advisory(snapshot: &Snapshot) -> Option<Advisory> {
    let size = snapshot.combined_size();
    (size > IMPLAUSIBLE_SIZE).then(|| Advisory::ImplausibleSize {
        bar: snapshot.bar.clone(),
        size,
    })
}

/// Sequential fold over a run's signals.
pub struct Simulator {
    params: SimulationParams,

    // Outputs accumulated during processing.
    snapshots: Vec<Snapshot>,
    advisories: Vec<Advisory>,
}

impl Simulator {
    pub fn new(params: SimulationParams) -> Self {
        Self {
            params,
            snapshots: Vec::new(),
            advisories: Vec::new(),
        }
    }

    /// Process the next bar's signal and return its snapshot.
    ///
    /// The first call bootstraps; each later call steps from the previous
    /// snapshot. On error nothing is appended.
    pub fn process_signal(&mut self, signal: &Signal) -> Result<&Snapshot, SimulationError> {
        let (snapshot, advisories) = match self.snapshots.last() {
            None => bootstrap(signal, &self.params)?,
            Some(prev) => step(prev, signal, &self.params)?,
        };
        self.advisories.extend(advisories);
        self.snapshots.push(snapshot);
        Ok(&self.snapshots[self.snapshots.len() - 1])
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Record advisories raised outside the engine, e.g. while parsing.
    pub fn note(&mut self, advisories: impl IntoIterator<Item = Advisory>) {
        self.advisories.extend(advisories);
    }

    pub fn into_outputs(self) -> Simulation {
        Simulation {
            snapshots: self.snapshots,
            advisories: self.advisories,
        }
    }
}

/// Run a whole signal history.
pub fn simulate(params: SimulationParams, signals: &[Signal]) -> Result<Simulation, SimulationError> {
    let mut simulator = Simulator::new(params);
    for signal in signals {
        simulator.process_signal(signal)?;
    }
    Ok(simulator.into_outputs())
}
