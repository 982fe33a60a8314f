use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::RowError;
use crate::types::RowIndex;

/// One row of an uploaded table before normalization: source column name to
/// raw cell value. Ordered keys keep header resolution deterministic.
pub type RawRow = BTreeMap<String, String>;

/// A row-level validation failure, reported alongside the valid output
/// instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Zero-based index of the offending row in the uploaded table.
    pub row_index: RowIndex,
    pub error_kind: String,
    pub detail: String,
}

impl Rejection {
    pub fn from_error(error: &RowError) -> Self {
        Self {
            row_index: error.row_index(),
            error_kind: error.kind().to_string(),
            detail: error.to_string(),
        }
    }
}
