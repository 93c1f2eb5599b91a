use super::runner::{RunError, RunSummary, Runner};
use crate::config::Config;
use crate::datasource::CsvFileSource;
use futures::future::join_all;
use std::path::PathBuf;

/// Outcome of one configured (signal file, result file) pair.
#[derive(Debug)]
pub struct RunOutcome {
    pub signals: PathBuf,
    pub results: PathBuf,
    pub result: Result<RunSummary, RunError>,
}

/// Run every configured pair concurrently. Runs share no state, so one
/// failure does not affect the others. Outcomes keep configuration order.
pub async fn run_batch(config: &Config) -> Vec<RunOutcome> {
    let runner = Runner::new(config.params);

    let runs = config.runs().into_iter().map(|(signals, results)| async move {
        let source = CsvFileSource::new(signals.clone(), config.headers);
        let result = runner.run(&source, &results).await;
        if let Err(e) = &result {
            tracing::error!("Calculation failed for {}: {}", signals.display(), e);
        }
        RunOutcome {
            signals,
            results,
            result,
        }
    });

    join_all(runs).await
}
