use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::CanonicalField;
use crate::types::RowIndex;

/// A row-scoped normalization failure. Never propagated across the batch
/// boundary: the normalizer collects these into rejections.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Required field [{field}] could not be resolved for row [{row_index}]")]
    MissingField {
        row_index: RowIndex,
        field: &'static str,
    },
    #[error("Unparseable date {value:?} in field [{field}] for row [{row_index}]")]
    DateParse {
        row_index: RowIndex,
        field: &'static str,
        value: String,
    },
    #[error("Invalid number in field [{field}] for row [{row_index}]: {detail}")]
    NumericParse {
        row_index: RowIndex,
        field: &'static str,
        detail: String,
    },
    #[error("Declared sales amount [{declared}] does not match derived [{derived}] for row [{row_index}]")]
    AmountMismatch {
        row_index: RowIndex,
        declared: Decimal,
        derived: Decimal,
    },
    #[error("Duplicate order id [{order_id}] for row [{row_index}]")]
    DuplicateOrder {
        row_index: RowIndex,
        order_id: String,
    },
}

impl RowError {
    pub fn missing_field(row_index: RowIndex, field: CanonicalField) -> Self {
        Self::MissingField {
            row_index,
            field: field.name(),
        }
    }

    pub fn date_parse(row_index: RowIndex, field: CanonicalField, value: &str) -> Self {
        Self::DateParse {
            row_index,
            field: field.name(),
            value: value.to_string(),
        }
    }

    pub fn numeric_parse(row_index: RowIndex, field: CanonicalField, value: &str) -> Self {
        Self::NumericParse {
            row_index,
            field: field.name(),
            detail: format!("could not parse {value:?}"),
        }
    }

    pub fn numeric_overflow(row_index: RowIndex, field: CanonicalField) -> Self {
        Self::NumericParse {
            row_index,
            field: field.name(),
            detail: "value overflows the supported numeric range".to_string(),
        }
    }

    pub fn numeric_range(row_index: RowIndex, field: CanonicalField, value: Decimal, constraint: &str) -> Self {
        Self::NumericParse {
            row_index,
            field: field.name(),
            detail: format!("{value} violates {constraint}"),
        }
    }

    pub fn amount_mismatch(row_index: RowIndex, declared: Decimal, derived: Decimal) -> Self {
        Self::AmountMismatch {
            row_index,
            declared,
            derived,
        }
    }

    pub fn duplicate_order(row_index: RowIndex, order_id: &str) -> Self {
        Self::DuplicateOrder {
            row_index,
            order_id: order_id.to_string(),
        }
    }

    pub fn row_index(&self) -> RowIndex {
        match self {
            Self::MissingField { row_index, .. }
            | Self::DateParse { row_index, .. }
            | Self::NumericParse { row_index, .. }
            | Self::AmountMismatch { row_index, .. }
            | Self::DuplicateOrder { row_index, .. } => *row_index,
        }
    }

    /// Stable kind label used in rejection reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MissingFieldError",
            Self::DateParse { .. } => "DateParseError",
            Self::NumericParse { .. } => "NumericParseError",
            Self::AmountMismatch { .. } => "AmountMismatchError",
            Self::DuplicateOrder { .. } => "DuplicateOrderError",
        }
    }
}
