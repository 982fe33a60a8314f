mod ingest_engine;

use serde::Serialize;

use crate::types::IngestionId;

pub use ingest_engine::IngestEngine;

/// Outcome of one upload, returned to the caller once the batch is stored.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub ingestion_id: IngestionId,
    pub source_file: String,
    pub rows_ingested: usize,
    pub rows_rejected: usize,
}
