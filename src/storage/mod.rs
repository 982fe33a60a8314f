mod fact_storage;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::SalesRecord;
use crate::types::IngestionId;

pub use fact_storage::FactStorage;

/// Downstream home of normalized records. Batches are immutable once
/// inserted; the only removal is a whole-batch purge by ingestion id.
pub trait FactStore: Send + Sync + 'static {
    /// Appends records under the given ingestion id. Chunked uploads insert
    /// several times with the same id.
    fn insert_batch(&self, ingestion_id: &str, records: Vec<SalesRecord>);
    fn batch(&self, ingestion_id: &str) -> Option<Vec<SalesRecord>>;
    /// Removes a batch, returning how many records were purged.
    fn purge_batch(&self, ingestion_id: &str) -> usize;
    /// Summarizes stored batches, newest last-record date first.
    fn recent_sources(&self, limit: usize) -> Vec<SourceSummary>;
}

/// One stored batch, summarized for upload listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub source_file: String,
    pub ingestion_id: IngestionId,
    pub first_date: NaiveDateTime,
    pub last_date: NaiveDateTime,
    pub row_count: usize,
}
