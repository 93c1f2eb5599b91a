pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod report;

pub use config::{Config, ConfigError};
pub use datasource::{CsvFileSource, MockSignalSource, SignalSource, SignalSourceError};
pub use domain::{Advisory, Book, Decimal, Signal, SignalRecord};
pub use engine::{simulate, SimulationError, SimulationParams, Simulator, Snapshot};
pub use error::AppError;
pub use orchestration::{run_batch, RunError, RunOutcome, RunSummary, Runner};
pub use report::{encode_csv, write_report, ReportError};
