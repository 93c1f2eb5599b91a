//! FIFO queue of open lots for one book.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{TryReserveError, VecDeque};

/// One unit of open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Negative for short lots, positive for long lots.
    pub quantity: Decimal,
    /// Fee-adjusted unit price; always positive.
    pub cost: Decimal,
    /// Negative for short lots (proceeds), positive for long lots (outlay).
    pub basis: Decimal,
}

/// Open lots, oldest at the front.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LotQueue {
    lots: VecDeque<Lot>,
}

impl LotQueue {
    pub fn new() -> Self {
        Self {
            lots: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Append lots at the tail, preserving their order. Fails without
    /// changing the queue if room for them cannot be allocated.
    pub fn append(&mut self, lots: Vec<Lot>) -> Result<(), TryReserveError> {
        self.lots.try_reserve(lots.len())?;
        self.lots.extend(lots);
        Ok(())
    }

    /// Remove the `n` oldest lots and return them in FIFO order.
    ///
    /// Callers derive `n` from exit deltas bounded by the previous ending
    /// size, so `n <= len()`; larger values are clamped.
    pub fn remove_oldest(&mut self, n: usize) -> Vec<Lot> {
        debug_assert!(n <= self.lots.len(), "removing {} of {} lots", n, self.lots.len());
        let n = n.min(self.lots.len());
        self.lots.drain(..n).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    pub fn total_quantity(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }

    pub fn total_basis(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.basis).sum()
    }
}
