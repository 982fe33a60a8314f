mod engine;
mod models;
mod normalize;
mod storage;
mod types;

use std::io::{BufWriter, stderr, stdout};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::engine::IngestEngine;
use crate::normalize::NormalizerConfig;
use crate::storage::{FactStorage, FactStore};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: sales-ingest [input].csv [log_level:optional] > [normalized].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        eprintln!("Set DEFAULT_CURRENCY to override the fallback currency (default: EUR)");
        exit(1);
    }

    let path = &args[1];
    let log_level = args
        .get(2)
        .map(|level| parse_log_level(level))
        .unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let mut config = NormalizerConfig::default();
    if let Ok(currency) = std::env::var("DEFAULT_CURRENCY") {
        config.default_currency = currency;
    }

    let storage = Arc::new(FactStorage::new());
    let engine = IngestEngine::new(storage.clone(), config);

    let timer = Instant::now();
    let report = engine.run(path).await?;
    let duration = timer.elapsed();

    info!(
        "Ingested {} rows ({} rejected) from [{}] in {duration:?}",
        report.rows_ingested, report.rows_rejected, report.source_file
    );

    write_batch_to_stdout(storage, &report.ingestion_id)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    // Normalized rows go to stdout, so logging has to stay on stderr.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}

fn write_batch_to_stdout(storage: Arc<FactStorage>, ingestion_id: &str) -> Result<()> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(stdout().lock()));

    for record in storage.batch(ingestion_id).unwrap_or_default() {
        writer.serialize(record)?;
    }

    writer.flush()?;

    Ok(())
}
