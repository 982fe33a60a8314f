use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::IngestionId;

/// A normalized sales fact, one per accepted source row.
///
/// Field order matches the `fact_sales` storage layout, so serializing a
/// record yields the canonical column order. Records are immutable once
/// stored; removal is only by batch purge on `ingestion_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: NaiveDateTime,
    /// Source order reference, unique within one ingestion batch.
    pub order_id: String,
    pub product: String,
    pub category: Option<String>,
    pub region: Option<String>,
    pub customer: Option<String>,
    pub salesperson: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub sales_amount: Decimal,
    /// ISO currency code, uppercased during normalization.
    pub currency: String,
    /// Original filename of the upload this record came from.
    pub source_file: String,
    /// Batch identifier shared by every record of one upload.
    pub ingestion_id: IngestionId,
}
