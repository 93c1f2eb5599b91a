//! Domain types for the FIFO trade simulator.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Book, Sign
//! - Signal records and their parsed form
//! - Advisories raised for questionable input

pub mod advisory;
pub mod decimal;
pub mod primitives;
pub mod signal;

pub use advisory::{Advisory, SignalField, IMPLAUSIBLE_SIZE};
pub use decimal::Decimal;
pub use primitives::{Book, Sign};
pub use signal::{Signal, SignalRecord};
