use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{CanonicalField, RawRow, Rejection, RowError, SalesRecord};
use crate::normalize::HeaderResolver;
use crate::types::{self, IngestionId, RowIndex, ValueParseError};

/// Tuning knobs for one normalizer instance.
pub struct NormalizerConfig {
    /// Extra header aliases layered over the built-in table,
    /// e.g. {"Tarih": Date, "Fiyat": UnitPrice}.
    pub aliases: HashMap<String, CanonicalField>,
    /// Currency applied when a row carries none.
    pub default_currency: String,
    /// Absolute tolerance when checking a declared sales amount against
    /// quantity * unit_price.
    pub amount_tolerance: Decimal,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            aliases: HashMap::new(),
            default_currency: "EUR".to_string(),
            // 0.01 absolute
            amount_tolerance: Decimal::new(1, 2),
        }
    }
}

/// The outcome of normalizing one uploaded table: every input row lands in
/// exactly one of the two sequences, both in original row order.
#[derive(Debug)]
pub struct NormalizedBatch {
    pub ingestion_id: IngestionId,
    pub source_file: String,
    pub records: Vec<SalesRecord>,
    pub rejections: Vec<Rejection>,
}

/// Converts heterogeneous report rows into canonical sales records.
///
/// Normalization is a pure, single-pass transformation: no storage, no
/// network, no shared mutable state. A malformed row becomes a rejection and
/// never aborts the batch, and a row is either emitted whole or rejected
/// whole.
pub struct Normalizer {
    resolver: HeaderResolver,
    default_currency: String,
    amount_tolerance: Decimal,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            resolver: HeaderResolver::new(&config.aliases),
            default_currency: config.default_currency.trim().to_uppercase(),
            amount_tolerance: config.amount_tolerance,
        }
    }

    /// Normalizes one uploaded table. Every call mints a fresh ingestion id
    /// shared by all records it produces.
    pub fn normalize(&self, rows: &[RawRow], source_file: &str) -> NormalizedBatch {
        let ingestion_id: IngestionId = Uuid::new_v4().simple().to_string();
        let mut records = Vec::new();
        let mut rejections = Vec::new();
        let mut seen_orders: HashSet<String> = HashSet::new();

        for (row_index, row) in rows.iter().enumerate() {
            match self.normalize_row(row_index, row, source_file, &ingestion_id) {
                Ok(record) => {
                    if seen_orders.contains(&record.order_id) {
                        let error = RowError::duplicate_order(row_index, &record.order_id);
                        rejections.push(Rejection::from_error(&error));
                    } else {
                        seen_orders.insert(record.order_id.clone());
                        records.push(record);
                    }
                }
                Err(error) => rejections.push(Rejection::from_error(&error)),
            }
        }

        NormalizedBatch {
            ingestion_id,
            source_file: source_file.to_string(),
            records,
            rejections,
        }
    }

    fn normalize_row(
        &self,
        row_index: RowIndex,
        row: &RawRow,
        source_file: &str,
        ingestion_id: &str,
    ) -> Result<SalesRecord, RowError> {
        let columns = self.resolver.resolve_row(row);

        let date_raw = required_value(row, &columns, CanonicalField::Date, row_index)?;
        let date = types::parse_date(date_raw)
            .map_err(|_| RowError::date_parse(row_index, CanonicalField::Date, date_raw))?;

        let order_id = required_value(row, &columns, CanonicalField::OrderId, row_index)?.to_string();
        let product = required_value(row, &columns, CanonicalField::Product, row_index)?.to_string();

        let quantity = parse_required_decimal(row, &columns, CanonicalField::Quantity, row_index)?;
        if quantity <= Decimal::ZERO {
            return Err(RowError::numeric_range(row_index, CanonicalField::Quantity, quantity, "quantity > 0"));
        }

        let unit_price = parse_required_decimal(row, &columns, CanonicalField::UnitPrice, row_index)?;
        if unit_price < Decimal::ZERO {
            return Err(RowError::numeric_range(row_index, CanonicalField::UnitPrice, unit_price, "unit_price >= 0"));
        }

        // Checked arithmetic: a garbage row must become a rejection, never a
        // panic that takes the whole batch with it.
        let derived = quantity
            .checked_mul(unit_price)
            .ok_or_else(|| RowError::numeric_overflow(row_index, CanonicalField::SalesAmount))?;

        let sales_amount = match optional_value(row, &columns, CanonicalField::SalesAmount) {
            Some(raw) => {
                let declared = types::parse_decimal(raw)
                    .map_err(|_| RowError::numeric_parse(row_index, CanonicalField::SalesAmount, raw))?;

                let delta = declared
                    .checked_sub(derived)
                    .ok_or_else(|| RowError::amount_mismatch(row_index, declared, derived))?;

                if delta.abs() > self.amount_tolerance {
                    return Err(RowError::amount_mismatch(row_index, declared, derived));
                }

                declared
            }
            None => derived,
        };

        let currency = match optional_value(row, &columns, CanonicalField::Currency) {
            Some(raw) => raw.to_uppercase(),
            None => self.default_currency.clone(),
        };
        if currency.is_empty() {
            return Err(RowError::missing_field(row_index, CanonicalField::Currency));
        }

        Ok(SalesRecord {
            date,
            order_id,
            product,
            category: optional_string(row, &columns, CanonicalField::Category),
            region: optional_string(row, &columns, CanonicalField::Region),
            customer: optional_string(row, &columns, CanonicalField::Customer),
            salesperson: optional_string(row, &columns, CanonicalField::Salesperson),
            quantity,
            unit_price,
            sales_amount,
            currency,
            source_file: source_file.to_string(),
            ingestion_id: ingestion_id.to_string(),
        })
    }
}

fn optional_value<'row>(
    row: &'row RawRow,
    columns: &HashMap<CanonicalField, String>,
    field: CanonicalField,
) -> Option<&'row str> {
    let value = columns.get(&field).and_then(|column| row.get(column))?.trim();

    if value.is_empty() { None } else { Some(value) }
}

fn required_value<'row>(
    row: &'row RawRow,
    columns: &HashMap<CanonicalField, String>,
    field: CanonicalField,
    row_index: RowIndex,
) -> Result<&'row str, RowError> {
    debug_assert!(field.is_required(), "optional field {} treated as required", field.name());

    optional_value(row, columns, field).ok_or_else(|| RowError::missing_field(row_index, field))
}

fn optional_string(
    row: &RawRow,
    columns: &HashMap<CanonicalField, String>,
    field: CanonicalField,
) -> Option<String> {
    optional_value(row, columns, field).map(str::to_string)
}

fn parse_required_decimal(
    row: &RawRow,
    columns: &HashMap<CanonicalField, String>,
    field: CanonicalField,
    row_index: RowIndex,
) -> Result<Decimal, RowError> {
    let raw = required_value(row, columns, field, row_index)?;

    types::parse_decimal(raw).map_err(|error| match error {
        ValueParseError::Empty => RowError::missing_field(row_index, field),
        _ => RowError::numeric_parse(row_index, field, raw),
    })
}
