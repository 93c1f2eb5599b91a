//! Batch orchestration: one simulation per configured signal file.

pub mod batch;
pub mod runner;

pub use batch::{run_batch, RunOutcome};
pub use runner::{RunError, RunOutput, RunSummary, Runner};
