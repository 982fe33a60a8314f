mod errors;
mod record;
mod row;
#[cfg(test)]
mod tests;

pub use errors::RowError;
pub use record::SalesRecord;
pub use row::{RawRow, Rejection};

/// The fields of the canonical `fact_sales` schema that are resolved from
/// uploaded source columns. `source_file` and `ingestion_id` are provenance
/// fields assigned during normalization, never read from the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Date,
    OrderId,
    Product,
    Category,
    Region,
    Customer,
    Salesperson,
    Quantity,
    UnitPrice,
    SalesAmount,
    Currency,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::Date,
        CanonicalField::OrderId,
        CanonicalField::Product,
        CanonicalField::Category,
        CanonicalField::Region,
        CanonicalField::Customer,
        CanonicalField::Salesperson,
        CanonicalField::Quantity,
        CanonicalField::UnitPrice,
        CanonicalField::SalesAmount,
        CanonicalField::Currency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::OrderId => "order_id",
            CanonicalField::Product => "product",
            CanonicalField::Category => "category",
            CanonicalField::Region => "region",
            CanonicalField::Customer => "customer",
            CanonicalField::Salesperson => "salesperson",
            CanonicalField::Quantity => "quantity",
            CanonicalField::UnitPrice => "unit_price",
            CanonicalField::SalesAmount => "sales_amount",
            CanonicalField::Currency => "currency",
        }
    }

    /// Whether a row must supply the field. `sales_amount` is required in the
    /// output but derivable, and `currency` falls back to the configured
    /// default, so neither is required in the source row.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            CanonicalField::Date
                | CanonicalField::OrderId
                | CanonicalField::Product
                | CanonicalField::Quantity
                | CanonicalField::UnitPrice
        )
    }
}
