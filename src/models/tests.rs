use super::{CanonicalField, Rejection, RowError};

use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

#[test]
fn test_error_kinds_use_stable_labels() -> Result<()> {
    let declared = Decimal::from_str("10.00")?;
    let derived = Decimal::from_str("28.50")?;

    assert_eq!(RowError::missing_field(0, CanonicalField::Product).kind(), "MissingFieldError");
    assert_eq!(RowError::date_parse(0, CanonicalField::Date, "n/a").kind(), "DateParseError");
    assert_eq!(RowError::numeric_parse(0, CanonicalField::Quantity, "x").kind(), "NumericParseError");
    assert_eq!(RowError::numeric_range(0, CanonicalField::Quantity, Decimal::ZERO, "quantity > 0").kind(), "NumericParseError");
    assert_eq!(RowError::amount_mismatch(0, declared, derived).kind(), "AmountMismatchError");
    assert_eq!(RowError::duplicate_order(0, "A-1").kind(), "DuplicateOrderError");

    Ok(())
}

#[test]
fn test_rejection_carries_row_index_kind_and_detail() {
    let error = RowError::missing_field(2, CanonicalField::Product);
    let rejection = Rejection::from_error(&error);

    assert_eq!(rejection.row_index, 2);
    assert_eq!(rejection.error_kind, "MissingFieldError");
    assert!(rejection.detail.contains("product"));
    assert!(rejection.detail.contains('2'));
}

#[test]
fn test_required_fields_cover_the_mandatory_schema_columns() {
    let required: Vec<&str> = CanonicalField::ALL
        .into_iter()
        .filter(|field| field.is_required())
        .map(CanonicalField::name)
        .collect();

    assert_eq!(required, ["date", "order_id", "product", "quantity", "unit_price"]);
}

#[test]
fn test_derivable_and_optional_fields_are_not_required() {
    assert!(!CanonicalField::SalesAmount.is_required());
    assert!(!CanonicalField::Currency.is_required());
    assert!(!CanonicalField::Category.is_required());
    assert!(!CanonicalField::Region.is_required());
}
