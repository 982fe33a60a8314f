use dashmap::DashMap;

use crate::models::SalesRecord;
use crate::storage::{FactStore, SourceSummary};
use crate::types::IngestionId;

/// In-memory fact store keyed by ingestion batch.
pub struct FactStorage {
    batches: DashMap<IngestionId, Vec<SalesRecord>>,
}

impl FactStorage {
    pub fn new() -> Self {
        Self {
            batches: DashMap::new(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.value().len()).sum()
    }
}

impl Default for FactStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FactStore for FactStorage {
    fn insert_batch(&self, ingestion_id: &str, records: Vec<SalesRecord>) {
        self.batches
            .entry(ingestion_id.to_string())
            .or_default()
            .extend(records);
    }

    fn batch(&self, ingestion_id: &str) -> Option<Vec<SalesRecord>> {
        self.batches.get(ingestion_id).map(|batch| batch.value().clone())
    }

    fn purge_batch(&self, ingestion_id: &str) -> usize {
        self.batches
            .remove(ingestion_id)
            .map(|(_, records)| records.len())
            .unwrap_or(0)
    }

    fn recent_sources(&self, limit: usize) -> Vec<SourceSummary> {
        let mut summaries: Vec<SourceSummary> = self
            .batches
            .iter()
            .filter_map(|batch| summarize(batch.key(), batch.value()))
            .collect();

        summaries.sort_by(|left, right| {
            right
                .last_date
                .cmp(&left.last_date)
                .then_with(|| left.ingestion_id.cmp(&right.ingestion_id))
        });
        summaries.truncate(limit);
        summaries
    }
}

fn summarize(ingestion_id: &str, records: &[SalesRecord]) -> Option<SourceSummary> {
    let first_date = records.iter().map(|record| record.date).min()?;
    let last_date = records.iter().map(|record| record.date).max()?;

    Some(SourceSummary {
        source_file: records[0].source_file.clone(),
        ingestion_id: ingestion_id.to_string(),
        first_date,
        last_date,
        row_count: records.len(),
    })
}
