use std::path::PathBuf;
use std::time::Instant;
use tradesim_fifo::{run_batch, AppError, Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let started = Instant::now();

    // Load configuration: a JSON file if given, otherwise the environment
    let loaded = match std::env::args_os().nth(1) {
        Some(path) => Config::from_file(&PathBuf::from(path)),
        None => Config::from_env(),
    };
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            let e = AppError::from(e);
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    let outcomes = run_batch(&config).await;
    let total = outcomes.len();
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => tracing::info!(
                "{} -> {}: {} bars, NAV {} -> {}, {} entries, {} exits, worst drawdown {}",
                outcome.signals.display(),
                outcome.results.display(),
                summary.bars,
                summary.starting_nav,
                summary.ending_nav,
                summary.entries,
                summary.exits,
                summary.worst_drawdown
            ),
            Err(_) => failed += 1,
        }
    }

    tracing::info!("Latency: {} ms", started.elapsed().as_millis());

    if failed > 0 {
        let e = AppError::Batch { failed, total };
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
