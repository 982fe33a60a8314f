use super::{HeaderResolver, Normalizer, NormalizerConfig};

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::{CanonicalField, RawRow};
use crate::types::parse_date;

fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn normalizer_with_currency(currency: &str) -> Normalizer {
    Normalizer::new(NormalizerConfig {
        default_currency: currency.to_string(),
        ..NormalizerConfig::default()
    })
}

fn valid_row(order_id: &str) -> RawRow {
    row(&[
        ("date", "2024-01-05"),
        ("order_id", order_id),
        ("product", "Widget"),
        ("quantity", "2"),
        ("unit_price", "10.00"),
    ])
}

#[test]
fn test_turkish_report_row_normalizes_with_default_currency() -> Result<()> {
    let normalizer = normalizer_with_currency("TRY");
    let rows = vec![row(&[
        ("Tarih", "2024-01-05"),
        ("Sipariş No", "S-1"),
        ("Ürün", "Widget"),
        ("Adet", "3"),
        ("Fiyat", "9,50"),
    ])];

    let batch = normalizer.normalize(&rows, "rapor.csv");

    assert!(batch.rejections.is_empty());
    let record = &batch.records[0];

    assert_eq!(record.date, parse_date("2024-01-05")?);
    assert_eq!(record.order_id, "S-1");
    assert_eq!(record.product, "Widget");
    assert_eq!(record.quantity, Decimal::from_str("3")?);
    assert_eq!(record.unit_price, Decimal::from_str("9.50")?);
    assert_eq!(record.sales_amount, Decimal::from_str("28.50")?);
    assert_eq!(record.currency, "TRY");
    assert_eq!(record.source_file, "rapor.csv");
    assert_eq!(record.ingestion_id, batch.ingestion_id);

    Ok(())
}

#[test]
fn test_absent_sales_amount_is_derived_exactly() -> Result<()> {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let rows = vec![row(&[
        ("date", "2024-01-05"),
        ("order_id", "A-1"),
        ("product", "Widget"),
        ("quantity", "3"),
        ("unit_price", "9.50"),
    ])];

    let batch = normalizer.normalize(&rows, "sample.csv");

    assert_eq!(batch.records[0].sales_amount, batch.records[0].quantity * batch.records[0].unit_price);
    assert_eq!(batch.records[0].sales_amount, Decimal::from_str("28.50")?);

    Ok(())
}

#[test]
fn test_declared_amount_within_tolerance_is_kept() -> Result<()> {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut source = valid_row("A-1");
    // Derived is 20.00; 20.01 sits exactly on the 0.01 tolerance boundary.
    source.insert("sales_amount".to_string(), "20.01".to_string());

    let batch = normalizer.normalize(&[source], "sample.csv");

    assert!(batch.rejections.is_empty());
    assert_eq!(batch.records[0].sales_amount, Decimal::from_str("20.01")?);

    Ok(())
}

#[test]
fn test_declared_amount_beyond_tolerance_is_rejected() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut source = valid_row("A-1");
    source.insert("sales_amount".to_string(), "20.02".to_string());

    let batch = normalizer.normalize(&[source], "sample.csv");

    assert!(batch.records.is_empty());
    assert_eq!(batch.rejections[0].error_kind, "AmountMismatchError");
    assert_eq!(batch.rejections[0].row_index, 0);
}

#[test]
fn test_ingestion_id_is_shared_within_and_distinct_across_calls() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let rows = vec![valid_row("A-1"), valid_row("A-2")];

    let first = normalizer.normalize(&rows, "sample.csv");
    let second = normalizer.normalize(&rows, "sample.csv");

    assert!(first.records.iter().all(|record| record.ingestion_id == first.ingestion_id));
    assert!(second.records.iter().all(|record| record.ingestion_id == second.ingestion_id));
    assert_ne!(first.ingestion_id, second.ingestion_id);
}

#[test]
fn test_canonical_headers_round_trip() -> Result<()> {
    let normalizer = normalizer_with_currency("EUR");
    let rows = vec![row(&[
        ("date", "2024-01-05T00:00:00"),
        ("order_id", "A-1"),
        ("product", "Widget"),
        ("category", "Tools"),
        ("region", "EMEA"),
        ("customer", "Acme"),
        ("salesperson", "Dani"),
        ("quantity", "2"),
        ("unit_price", "10.00"),
        ("sales_amount", "20.00"),
        ("currency", "EUR"),
    ])];

    let batch = normalizer.normalize(&rows, "roundtrip.csv");

    assert!(batch.rejections.is_empty());
    let record = &batch.records[0];

    assert_eq!(record.date, parse_date("2024-01-05")?);
    assert_eq!(record.order_id, "A-1");
    assert_eq!(record.product, "Widget");
    assert_eq!(record.category.as_deref(), Some("Tools"));
    assert_eq!(record.region.as_deref(), Some("EMEA"));
    assert_eq!(record.customer.as_deref(), Some("Acme"));
    assert_eq!(record.salesperson.as_deref(), Some("Dani"));
    assert_eq!(record.quantity, Decimal::from_str("2")?);
    assert_eq!(record.unit_price, Decimal::from_str("10.00")?);
    assert_eq!(record.sales_amount, Decimal::from_str("20.00")?);
    assert_eq!(record.currency, "EUR");

    Ok(())
}

#[test]
fn test_missing_product_rejects_only_that_row() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut broken = valid_row("A-3");
    broken.remove("product");
    let rows = vec![valid_row("A-1"), valid_row("A-2"), broken, valid_row("A-4")];

    let batch = normalizer.normalize(&rows, "sample.csv");

    assert_eq!(batch.records.len(), 3);
    assert_eq!(batch.rejections.len(), 1);
    assert_eq!(batch.rejections[0].row_index, 2);
    assert_eq!(batch.rejections[0].error_kind, "MissingFieldError");
}

#[test]
fn test_row_indices_partition_the_input() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut bad_date = valid_row("A-2");
    bad_date.insert("date".to_string(), "not-a-date".to_string());
    let mut bad_quantity = valid_row("A-4");
    bad_quantity.insert("quantity".to_string(), "many".to_string());
    let rows = vec![valid_row("A-1"), bad_date, valid_row("A-3"), bad_quantity, valid_row("A-5")];

    let batch = normalizer.normalize(&rows, "sample.csv");

    // Valid rows keep their original relative order.
    let order_ids: Vec<&str> = batch.records.iter().map(|record| record.order_id.as_str()).collect();
    assert_eq!(order_ids, ["A-1", "A-3", "A-5"]);

    let rejected: Vec<usize> = batch.rejections.iter().map(|rejection| rejection.row_index).collect();
    assert_eq!(rejected, [1, 3]);
    assert_eq!(batch.records.len() + batch.rejections.len(), rows.len());
}

#[test]
fn test_duplicate_order_id_keeps_first_occurrence() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let rows = vec![valid_row("A-1"), valid_row("A-1")];

    let batch = normalizer.normalize(&rows, "sample.csv");

    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.rejections.len(), 1);
    assert_eq!(batch.rejections[0].row_index, 1);
    assert_eq!(batch.rejections[0].error_kind, "DuplicateOrderError");
}

#[test]
fn test_unparseable_date_and_numeric_use_their_own_kinds() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut bad_date = valid_row("A-1");
    bad_date.insert("date".to_string(), "soon".to_string());
    let mut bad_price = valid_row("A-2");
    bad_price.insert("unit_price".to_string(), "cheap".to_string());

    let batch = normalizer.normalize(&[bad_date, bad_price], "sample.csv");

    assert_eq!(batch.rejections[0].error_kind, "DateParseError");
    assert_eq!(batch.rejections[1].error_kind, "NumericParseError");
}

#[test]
fn test_out_of_range_quantities_are_rejected() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut zero_quantity = valid_row("A-1");
    zero_quantity.insert("quantity".to_string(), "0".to_string());
    let mut negative_price = valid_row("A-2");
    negative_price.insert("unit_price".to_string(), "-1.00".to_string());

    let batch = normalizer.normalize(&[zero_quantity, negative_price], "sample.csv");

    assert!(batch.records.is_empty());
    assert!(batch.rejections.iter().all(|rejection| rejection.error_kind == "NumericParseError"));
}

#[test]
fn test_overflowing_derived_amount_rejects_only_that_row() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut huge = valid_row("A-1");
    // Decimal::MAX; doubling it cannot be represented.
    huge.insert("quantity".to_string(), "79228162514264337593543950335".to_string());
    huge.insert("unit_price".to_string(), "2".to_string());

    let batch = normalizer.normalize(&[huge, valid_row("A-2")], "sample.csv");

    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].order_id, "A-2");
    assert_eq!(batch.rejections.len(), 1);
    assert_eq!(batch.rejections[0].row_index, 0);
    assert_eq!(batch.rejections[0].error_kind, "NumericParseError");
}

#[test]
fn test_overflowing_amount_delta_is_a_mismatch_not_a_panic() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut source = valid_row("A-1");
    source.insert("quantity".to_string(), "79228162514264337593543950335".to_string());
    source.insert("unit_price".to_string(), "1".to_string());
    // Comparing against the derived maximum would overflow the subtraction.
    source.insert("sales_amount".to_string(), "-79228162514264337593543950335".to_string());

    let batch = normalizer.normalize(&[source], "sample.csv");

    assert!(batch.records.is_empty());
    assert_eq!(batch.rejections[0].error_kind, "AmountMismatchError");
}

#[test]
fn test_required_flags_match_normalizer_behavior() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let full = row(&[
        ("date", "2024-01-05"),
        ("order_id", "A-1"),
        ("product", "Widget"),
        ("category", "Tools"),
        ("region", "EMEA"),
        ("customer", "Acme"),
        ("salesperson", "Dani"),
        ("quantity", "2"),
        ("unit_price", "10.00"),
        ("sales_amount", "20.00"),
        ("currency", "EUR"),
    ]);

    for field in CanonicalField::ALL {
        let mut source = full.clone();
        source.remove(field.name());

        let batch = normalizer.normalize(&[source], "sample.csv");

        if field.is_required() {
            assert_eq!(batch.rejections.len(), 1, "dropping {} should reject the row", field.name());
            assert_eq!(batch.rejections[0].error_kind, "MissingFieldError");
        } else {
            assert_eq!(batch.records.len(), 1, "dropping {} should still normalize", field.name());
        }
    }
}

#[test]
fn test_zero_valid_rows_is_not_an_error() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let rows = vec![row(&[("note", "not a sales table")]), row(&[("note", "still not")])];

    let batch = normalizer.normalize(&rows, "notes.csv");

    assert!(batch.records.is_empty());
    assert_eq!(batch.rejections.len(), 2);
}

#[test]
fn test_empty_table_yields_empty_batch() {
    let normalizer = Normalizer::new(NormalizerConfig::default());

    let batch = normalizer.normalize(&[], "empty.csv");

    assert!(batch.records.is_empty());
    assert!(batch.rejections.is_empty());
}

#[test]
fn test_currency_from_row_is_uppercased() {
    let normalizer = Normalizer::new(NormalizerConfig::default());
    let mut source = valid_row("A-1");
    source.insert("currency".to_string(), "try".to_string());

    let batch = normalizer.normalize(&[source], "sample.csv");

    assert_eq!(batch.records[0].currency, "TRY");
}

#[test]
fn test_configured_alias_overrides_win() {
    let mut aliases = HashMap::new();
    aliases.insert("Ref".to_string(), CanonicalField::OrderId);
    let normalizer = Normalizer::new(NormalizerConfig {
        aliases,
        ..NormalizerConfig::default()
    });

    let mut source = valid_row("ignored");
    source.remove("order_id");
    source.insert("Ref".to_string(), "R-7".to_string());

    let batch = normalizer.normalize(&[source], "sample.csv");

    assert_eq!(batch.records[0].order_id, "R-7");
}

#[test]
fn test_misspelled_header_resolves_through_similarity_fallback() {
    let resolver = HeaderResolver::new(&HashMap::new());
    let source = row(&[("Prodcut", "Widget"), ("date", "2024-01-05")]);

    let columns = resolver.resolve_row(&source);

    assert_eq!(columns.get(&CanonicalField::Product).map(String::as_str), Some("Prodcut"));
    assert_eq!(columns.get(&CanonicalField::Date).map(String::as_str), Some("date"));
}

#[test]
fn test_resolver_never_reuses_a_source_column() {
    let resolver = HeaderResolver::new(&HashMap::new());
    let source = row(&[("amount", "20.00")]);

    let columns = resolver.resolve_row(&source);

    let hits = CanonicalField::ALL
        .into_iter()
        .filter(|field| columns.get(field).map(String::as_str) == Some("amount"))
        .count();

    assert_eq!(hits, 1);
}
