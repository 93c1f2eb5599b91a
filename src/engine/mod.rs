//! Pure computation engine for bar-by-bar FIFO trade simulation.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

pub mod ledger;
pub mod lot_queue;
pub mod returns;
pub mod risk;
pub mod signal_interpreter;
pub mod simulator;
pub mod tally;

pub use ledger::Ioe;
pub use lot_queue::{Lot, LotQueue};
pub use returns::BookReturns;
pub use risk::RiskState;
pub use signal_interpreter::{PositionDeltas, Transition};
pub use simulator::{simulate, Simulation, SimulationError, Simulator};
pub use tally::Tally;

/// Parameters shared by every bar of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Cash initially allocated for trading.
    pub cash_base: Decimal,
    /// Cash committed per unit of position.
    pub limit: Decimal,
    /// Flat fee per unit of instrument traded.
    pub fee: Decimal,
}

/// Close and trade prices of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prices {
    pub close: Decimal,
    pub trade: Decimal,
}

/// Ledger state of one book at the end of a bar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookState {
    pub position: Ioe,
    pub quantity: Tally,
    pub basis: Tally,
    pub net_cash_flow: Tally,
    pub market_value: Decimal,
    pub returns: BookReturns,
    /// Open lots as they stand at the end of the bar.
    pub queue: LotQueue,
}

/// Result of one bar. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bar identifier from the input; not required to be unique.
    pub bar: String,
    pub prices: Prices,
    /// Rule that classified the signal; `None` on the first bar.
    pub transition: Option<Transition>,
    pub short: BookState,
    pub long: BookState,
    pub cumulative_return: Decimal,
    pub risk: RiskState,
    /// Reserved for exits blocked to avoid a loss; never set.
    pub exit_blocked: bool,
}

impl Snapshot {
    pub fn nav(&self) -> Decimal {
        self.risk.nav
    }

    /// Ending size of both books combined.
    pub fn combined_size(&self) -> usize {
        self.short.position.ending + self.long.position.ending
    }
}
