use std::collections::HashMap;

use crate::models::{CanonicalField, RawRow};

/// Header names recognized out of the box, covering the English and Turkish
/// report layouts seen in production uploads. Configured aliases are layered
/// on top and win on conflict.
const BUILTIN_ALIASES: &[(&str, CanonicalField)] = &[
    ("tarih", CanonicalField::Date),
    ("order date", CanonicalField::Date),
    ("invoice date", CanonicalField::Date),
    ("datetime", CanonicalField::Date),
    ("sipariş no", CanonicalField::OrderId),
    ("siparis no", CanonicalField::OrderId),
    ("order no", CanonicalField::OrderId),
    ("order", CanonicalField::OrderId),
    ("invoice", CanonicalField::OrderId),
    ("invoice no", CanonicalField::OrderId),
    ("ürün", CanonicalField::Product),
    ("urun", CanonicalField::Product),
    ("product name", CanonicalField::Product),
    ("item", CanonicalField::Product),
    ("item name", CanonicalField::Product),
    ("kategori", CanonicalField::Category),
    ("product category", CanonicalField::Category),
    ("bölge", CanonicalField::Region),
    ("bolge", CanonicalField::Region),
    ("territory", CanonicalField::Region),
    ("müşteri", CanonicalField::Customer),
    ("musteri", CanonicalField::Customer),
    ("client", CanonicalField::Customer),
    ("customer name", CanonicalField::Customer),
    ("satış temsilcisi", CanonicalField::Salesperson),
    ("satis temsilcisi", CanonicalField::Salesperson),
    ("satıcı", CanonicalField::Salesperson),
    ("sales rep", CanonicalField::Salesperson),
    ("rep", CanonicalField::Salesperson),
    ("seller", CanonicalField::Salesperson),
    ("adet", CanonicalField::Quantity),
    ("qty", CanonicalField::Quantity),
    ("miktar", CanonicalField::Quantity),
    ("units", CanonicalField::Quantity),
    ("fiyat", CanonicalField::UnitPrice),
    ("birim fiyat", CanonicalField::UnitPrice),
    ("price", CanonicalField::UnitPrice),
    ("price per unit", CanonicalField::UnitPrice),
    ("tutar", CanonicalField::SalesAmount),
    ("toplam", CanonicalField::SalesAmount),
    ("amount", CanonicalField::SalesAmount),
    ("total", CanonicalField::SalesAmount),
    ("revenue", CanonicalField::SalesAmount),
    ("line total", CanonicalField::SalesAmount),
    ("para birimi", CanonicalField::Currency),
    ("döviz", CanonicalField::Currency),
    ("doviz", CanonicalField::Currency),
    ("currency code", CanonicalField::Currency),
];

/// Resolves arbitrary source column names to canonical fields.
///
/// Resolution is ranked: an alias-table hit (canonical names and configured
/// overrides included) always outranks the string-similarity fallback, and
/// each source column feeds at most one canonical field. The fallback is
/// deterministic: smallest edit distance wins, ties break on the
/// lexicographically smallest column name.
pub struct HeaderResolver {
    aliases: HashMap<String, CanonicalField>,
}

impl HeaderResolver {
    pub fn new(overrides: &HashMap<String, CanonicalField>) -> Self {
        let mut aliases = HashMap::new();

        for field in CanonicalField::ALL {
            aliases.insert(field.name().to_string(), field);
        }

        for (alias, field) in BUILTIN_ALIASES {
            aliases.insert(normalize_header(alias), *field);
        }

        for (alias, field) in overrides {
            aliases.insert(normalize_header(alias), *field);
        }

        Self { aliases }
    }

    /// Maps each resolvable canonical field to the source column supplying it.
    pub fn resolve_row(&self, row: &RawRow) -> HashMap<CanonicalField, String> {
        // RawRow is a BTreeMap, so the key order here is stable.
        let keys: Vec<(String, &str)> = row
            .keys()
            .map(|key| (normalize_header(key), key.as_str()))
            .collect();

        let mut resolved: HashMap<CanonicalField, String> = HashMap::new();
        let mut used: Vec<&str> = Vec::new();

        for field in CanonicalField::ALL {
            for (normalized, original) in &keys {
                if used.contains(original) {
                    continue;
                }
                if self.aliases.get(normalized) == Some(&field) {
                    resolved.insert(field, (*original).to_string());
                    used.push(*original);
                    break;
                }
            }
        }

        for field in CanonicalField::ALL {
            if resolved.contains_key(&field) {
                continue;
            }
            if let Some(original) = self.closest_match(field, &keys, &used) {
                used.push(original);
                resolved.insert(field, original.to_string());
            }
        }

        resolved
    }

    fn closest_match<'row>(
        &self,
        field: CanonicalField,
        keys: &[(String, &'row str)],
        used: &[&str],
    ) -> Option<&'row str> {
        let candidates: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, mapped)| **mapped == field)
            .map(|(alias, _)| alias.as_str())
            .collect();

        let mut best: Option<(usize, &'row str)> = None;

        for (normalized, original) in keys {
            if used.contains(original) {
                continue;
            }

            for candidate in &candidates {
                if !within_similarity_threshold(normalized, candidate) {
                    continue;
                }

                let distance = edit_distance(normalized, candidate);
                let better = match best {
                    None => true,
                    Some((best_distance, best_key)) => {
                        distance < best_distance || (distance == best_distance && *original < best_key)
                    }
                };

                if better {
                    best = Some((distance, *original));
                }
            }
        }

        best.map(|(_, original)| original)
    }
}

/// Lowercases and collapses separator characters so "Unit Price", "unit-price"
/// and "unit_price" all compare equal.
pub fn normalize_header(header: &str) -> String {
    let mut normalized = String::with_capacity(header.len());

    for symbol in header.trim().to_lowercase().chars() {
        if symbol.is_whitespace() || symbol == '-' || symbol == '_' {
            if !normalized.ends_with('_') {
                normalized.push('_');
            }
        } else {
            normalized.push(symbol);
        }
    }

    normalized.trim_matches('_').to_string()
}

fn within_similarity_threshold(key: &str, candidate: &str) -> bool {
    let distance = edit_distance(key, candidate);
    let longer = key.chars().count().max(candidate.chars().count());

    distance > 0 && distance * 3 <= longer
}

fn edit_distance(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];

    for (row, left_symbol) in left.iter().enumerate() {
        current[0] = row + 1;

        for (column, right_symbol) in right.iter().enumerate() {
            let substitution = previous[column] + usize::from(left_symbol != right_symbol);
            current[column + 1] = substitution
                .min(previous[column + 1] + 1)
                .min(current[column] + 1);
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}
