use crate::datasource::{SignalSource, SignalSourceError};
use crate::domain::{Advisory, Decimal, Signal};
use crate::engine::{SimulationError, SimulationParams, Simulator, Snapshot};
use crate::report::{write_report, ReportError};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SignalSourceError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Headline figures of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub bars: usize,
    pub starting_nav: Decimal,
    pub ending_nav: Decimal,
    pub ending_bar: String,
    pub entries: u64,
    pub exits: u64,
    pub worst_drawdown: Decimal,
    pub advisories: usize,
}

impl RunSummary {
    fn from_snapshots(first: &Snapshot, last: &Snapshot, bars: usize, advisories: usize) -> Self {
        Self {
            bars,
            starting_nav: first.nav(),
            ending_nav: last.nav(),
            ending_bar: last.bar.clone(),
            entries: last.risk.entries,
            exits: last.risk.exits,
            worst_drawdown: last.risk.worst_drawdown,
            advisories,
        }
    }
}

/// Completed run: every snapshot, every advisory and the summary.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub snapshots: Vec<Snapshot>,
    pub advisories: Vec<Advisory>,
    pub summary: RunSummary,
}

/// Runs one signal history through the simulator.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    params: SimulationParams,
}

impl Runner {
    pub fn new(params: SimulationParams) -> Self {
        Self { params }
    }

    /// Fetch, parse and simulate without writing anything.
    pub async fn simulate(&self, source: &dyn SignalSource) -> Result<RunOutput, RunError> {
        let records = source.fetch_records().await?;

        tracing::info!(
            "Cash allocated: {}, limit per position: {}, fee: {}",
            self.params.cash_base,
            self.params.limit,
            self.params.fee
        );

        let mut simulator = Simulator::new(self.params);
        for record in &records {
            let (signal, advisories) = Signal::parse(record);
            simulator.note(advisories);
            simulator.process_signal(&signal)?;
        }
        let simulation = simulator.into_outputs();

        for advisory in &simulation.advisories {
            tracing::warn!("{}: {}", source.describe(), advisory);
        }

        let (Some(first), Some(last)) = (simulation.snapshots.first(), simulation.snapshots.last())
        else {
            return Err(SignalSourceError::Empty(source.describe()).into());
        };
        let summary = RunSummary::from_snapshots(
            first,
            last,
            simulation.snapshots.len(),
            simulation.advisories.len(),
        );

        tracing::info!("Starting NAV: {}", summary.starting_nav);
        tracing::info!("Ending NAV  : {} on {}", summary.ending_nav, summary.ending_bar);
        tracing::info!(
            "Number of finished trades: {} on {}",
            summary.exits,
            summary.ending_bar
        );
        tracing::info!("Worst drawdown: {}", summary.worst_drawdown);

        Ok(RunOutput {
            snapshots: simulation.snapshots,
            advisories: simulation.advisories,
            summary,
        })
    }

    /// Simulate and write the result table to `output`.
    pub async fn run(
        &self,
        source: &dyn SignalSource,
        output: &Path,
    ) -> Result<RunSummary, RunError> {
        let result = self.simulate(source).await?;
        write_report(output, &result.snapshots).await?;
        Ok(result.summary)
    }
}
