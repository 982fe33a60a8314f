use std::str::FromStr;

use rust_decimal::Decimal;

use crate::types::errors::ValueParseError;

/// Parses a decimal that may use either a comma or a dot as the decimal
/// separator, with optional thousands grouping in the other symbol.
///
/// Uploaded reports mix locales freely ("9.50", "9,50", "1.234,56",
/// "1,234.56"), so the separator roles are decided per value:
/// - both symbols present: the one appearing last is the decimal separator,
///   the other is grouping and is stripped;
/// - a single symbol appearing once is the decimal separator;
/// - a single symbol appearing more than once is grouping and is stripped.
pub fn parse_decimal(raw: &str) -> Result<Decimal, ValueParseError> {
    let value = raw.trim();

    if value.is_empty() {
        return Err(ValueParseError::Empty);
    }

    let canonical = canonicalize_separators(value)
        .ok_or_else(|| ValueParseError::InvalidNumber(raw.to_string()))?;

    Decimal::from_str(&canonical).map_err(|_| ValueParseError::InvalidNumber(raw.to_string()))
}

fn canonicalize_separators(value: &str) -> Option<String> {
    let last_comma = value.rfind(',');
    let last_dot = value.rfind('.');

    let decimal_separator = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => {
            if comma > dot { Some(',') } else { Some('.') }
        }
        (Some(_), None) => {
            if value.matches(',').count() == 1 { Some(',') } else { None }
        }
        (None, Some(_)) => {
            if value.matches('.').count() == 1 { Some('.') } else { None }
        }
        (None, None) => None,
    };

    let mut canonical = String::with_capacity(value.len());
    let mut seen_decimal = false;

    for symbol in value.chars() {
        match symbol {
            ',' | '.' => {
                if Some(symbol) == decimal_separator {
                    // A second occurrence of the decimal separator means the
                    // value is malformed, not grouped.
                    if seen_decimal {
                        return None;
                    }
                    seen_decimal = true;
                    canonical.push('.');
                }
            }
            _ => canonical.push(symbol),
        }
    }

    Some(canonical)
}
