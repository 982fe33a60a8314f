use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, Trim};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, spawn_blocking};
use tracing::{error, info, warn};

use crate::engine::IngestReport;
use crate::models::RawRow;
use crate::normalize::{Normalizer, NormalizerConfig};
use crate::storage::FactStore;

/// Drives one upload end to end: stream the CSV off a blocking reader task,
/// normalize the collected table, store the valid records.
pub struct IngestEngine<S: FactStore> {
    storage: Arc<S>,
    normalizer: Normalizer,
    backpressure: usize,
}

impl<S: FactStore> IngestEngine<S> {
    pub fn new(storage: Arc<S>, config: NormalizerConfig) -> Self {
        Self {
            storage,
            normalizer: Normalizer::new(config),
            backpressure: 256,
        }
    }

    /// Ingests one CSV file. A missing or unreadable file yields an empty
    /// batch rather than an error; per-row problems become rejections.
    pub async fn run(&self, path: &str) -> anyhow::Result<IngestReport> {
        let (sender, receiver) = mpsc::channel::<RawRow>(self.backpressure);
        let reader_handle = Self::spawn_csv_reader(path.to_string(), sender);
        let rows = Self::collect_rows(receiver).await;

        if let Err(join_error) = reader_handle.await {
            error!("CSV reader task failed: {join_error}");
        }

        let source_file = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        let batch = self.normalizer.normalize(&rows, &source_file);

        for rejection in &batch.rejections {
            warn!(
                "Rejected row [{}] of [{}]: {} ({})",
                rejection.row_index, source_file, rejection.detail, rejection.error_kind
            );
        }

        let report = IngestReport {
            ingestion_id: batch.ingestion_id.clone(),
            source_file: batch.source_file.clone(),
            rows_ingested: batch.records.len(),
            rows_rejected: batch.rejections.len(),
        };

        self.storage.insert_batch(&batch.ingestion_id, batch.records);

        info!(
            "Ingestion [{}] of [{}] stored {} rows, rejected {}",
            report.ingestion_id, report.source_file, report.rows_ingested, report.rows_rejected
        );

        Ok(report)
    }

    fn spawn_csv_reader(path: String, sender: mpsc::Sender<RawRow>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(io_error) => {
                    error!("Error opening CSV at path: {path} | {io_error}");
                    return;
                }
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            let headers = match reader.headers() {
                Ok(headers) => headers.clone(),
                Err(csv_error) => {
                    error!("Error reading CSV headers from {path} | {csv_error}");
                    return;
                }
            };

            for result in reader.records() {
                match result {
                    Ok(record) => {
                        let row: RawRow = headers
                            .iter()
                            .zip(record.iter())
                            .filter(|(header, _)| !header.is_empty())
                            .map(|(header, value)| (header.to_string(), value.to_string()))
                            .collect();

                        if sender.blocking_send(row).is_err() {
                            break;
                        }
                    }
                    Err(csv_error) => {
                        error!("CSV framing error in {path} | {csv_error}");
                    }
                }
            }
        })
    }

    async fn collect_rows(mut receiver: mpsc::Receiver<RawRow>) -> Vec<RawRow> {
        let mut rows = Vec::new();

        while let Some(row) = receiver.recv().await {
            rows.push(row);
        }

        rows
    }
}
