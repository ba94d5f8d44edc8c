//! Type-directed cell normalizers.
//!
//! Each normalizer maps one raw cell to its canonical string, or to
//! [`NULL_VALUE`] when the cell is absent. Only currency and date can fail.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{FieldType, NULL_VALUE};

/// Accepted date layouts, tried in order. The first that parses wins.
pub const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Canonical output layout for every date.
pub const CANONICAL_DATE_FORMAT: &str = "%m/%d/%Y";

const GENDER_SYNONYMS: &[(&str, &[&str])] = &[
    ("male", &["male", "m", "man", "boy"]),
    ("female", &["female", "f", "woman", "girl"]),
    ("other", &["other", "non-binary", "nonbinary", "nb", "genderqueer", "genderfluid"]),
];

const PHONE_DIGITS: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("invalid dollar amount '{0}'")]
    InvalidCurrency(String),
    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

fn is_absent(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == NULL_VALUE
}

/// Dispatch on the declared type. `Untyped` values pass through unchanged.
pub fn normalize(value: &str, field_type: FieldType) -> Result<String, NormalizeError> {
    match field_type {
        FieldType::String => Ok(normalize_string(value)),
        FieldType::Date => normalize_date(value),
        FieldType::Currency => normalize_currency(value),
        FieldType::Name => Ok(normalize_name(value)),
        FieldType::Gender => Ok(normalize_gender(value)),
        FieldType::Phone => Ok(normalize_phone(value)),
        FieldType::Email => Ok(normalize_email(value)),
        FieldType::Untyped => Ok(value.to_string()),
    }
}

/// Map gender synonyms onto `male` / `female` / `other`. Unknown values are `other`.
pub fn normalize_gender(value: &str) -> String {
    if is_absent(value) {
        return NULL_VALUE.to_string();
    }
    let folded = value.trim().to_lowercase();
    GENDER_SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&folded.as_str()))
        .map_or("other", |(canonical, _)| *canonical)
        .to_string()
}

/// Keep digits and the decimal point, render with two fraction digits.
///
/// A cell made only of symbols (`$`, `-`) is absent; a cell with letters but
/// no digits is not an amount at all.
pub fn normalize_currency(value: &str) -> Result<String, NormalizeError> {
    if is_absent(value) {
        return Ok(NULL_VALUE.to_string());
    }
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        if value.chars().any(char::is_alphabetic) {
            return Err(NormalizeError::InvalidCurrency(value.to_string()));
        }
        return Ok(NULL_VALUE.to_string());
    }
    let amount: f64 = cleaned
        .parse()
        .map_err(|_| NormalizeError::InvalidCurrency(value.to_string()))?;
    Ok(format!("{amount:.2}"))
}

/// Does `value` have the field shape of `fmt`: a four-digit year and one- or
/// two-digit day and month? chrono's `%Y` alone takes any digit count.
fn matches_shape(value: &str, fmt: &str) -> bool {
    let Some(sep) = fmt.chars().find(|c| *c == '/' || *c == '-') else {
        return false;
    };
    let fields: Vec<&str> = value.split(sep).collect();
    let slots: Vec<&str> = fmt.split(sep).collect();
    fields.len() == slots.len()
        && fields.iter().zip(&slots).all(|(field, slot)| {
            let digits = !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit());
            let width_ok = match *slot {
                "%Y" => field.len() == 4,
                _ => field.len() <= 2,
            };
            digits && width_ok
        })
}

/// Parse with the first matching layout of [`DATE_FORMATS`].
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .filter(|fmt| matches_shape(trimmed, fmt))
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

pub fn normalize_date(value: &str) -> Result<String, NormalizeError> {
    if is_absent(value) {
        return Ok(NULL_VALUE.to_string());
    }
    parse_date(value)
        .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
        .ok_or_else(|| NormalizeError::InvalidDate(value.to_string()))
}

/// Strip hyphens, trim, lower-case.
pub fn normalize_name(value: &str) -> String {
    if is_absent(value) {
        return NULL_VALUE.to_string();
    }
    let stripped: String = value.chars().filter(|c| *c != '-').collect();
    let folded = stripped.trim().to_lowercase();
    if folded.is_empty() {
        NULL_VALUE.to_string()
    } else {
        folded
    }
}

pub fn normalize_string(value: &str) -> String {
    if is_absent(value) {
        return NULL_VALUE.to_string();
    }
    value.trim().to_lowercase()
}

/// Digits only, zero-padded on the left to 11 digits, then cut to 11.
pub fn normalize_phone(value: &str) -> String {
    if is_absent(value) {
        return NULL_VALUE.to_string();
    }
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let padded = format!("{digits:0>width$}", width = PHONE_DIGITS);
    padded.chars().take(PHONE_DIGITS).collect()
}

pub fn normalize_email(value: &str) -> String {
    normalize_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_synonyms() {
        assert_eq!(normalize_gender("F"), "female");
        assert_eq!(normalize_gender(" Woman "), "female");
        assert_eq!(normalize_gender("M"), "male");
        assert_eq!(normalize_gender("boy"), "male");
        assert_eq!(normalize_gender("NB"), "other");
        assert_eq!(normalize_gender("genderfluid"), "other");
        assert_eq!(normalize_gender("unknown"), "other");
        assert_eq!(normalize_gender(""), "null");
        assert_eq!(normalize_gender("null"), "null");
    }

    #[test]
    fn currency() {
        assert_eq!(normalize_currency("$1,234.5").unwrap(), "1234.50");
        assert_eq!(normalize_currency("50000").unwrap(), "50000.00");
        assert_eq!(normalize_currency("").unwrap(), "null");
        assert_eq!(normalize_currency("$").unwrap(), "null");
        assert_eq!(normalize_currency("USD 100").unwrap(), "100.00");
        assert_eq!(
            normalize_currency("abc"),
            Err(NormalizeError::InvalidCurrency("abc".into()))
        );
        assert_eq!(
            normalize_currency("1.2.3"),
            Err(NormalizeError::InvalidCurrency("1.2.3".into()))
        );
        assert!(normalize_currency("$.").is_err());
    }

    #[test]
    fn currency_via_dispatch() {
        assert!(normalize("..", FieldType::Currency).is_err());
        assert_eq!(normalize("null", FieldType::Currency).unwrap(), "null");
    }

    #[test]
    fn date_precedence() {
        assert_eq!(normalize_date("2024-03-07").unwrap(), "03/07/2024");
        assert_eq!(normalize_date("03/07/2024").unwrap(), "03/07/2024");
        // dd-mm-yyyy: 7 March
        assert_eq!(normalize_date("07-03-2024").unwrap(), "03/07/2024");
        // Ambiguous slash dates read month first.
        assert_eq!(normalize_date("04/05/2024").unwrap(), "04/05/2024");
        // Month 13 falls through to dd/mm/yyyy.
        assert_eq!(normalize_date("13/01/2024").unwrap(), "01/13/2024");
        assert_eq!(normalize_date("").unwrap(), "null");
        assert_eq!(
            normalize_date("March 7"),
            Err(NormalizeError::InvalidDate("March 7".into()))
        );
    }

    #[test]
    fn short_years_are_rejected() {
        for value in ["03/07/24", "07-03-24", "24-03-07", "3/7/024", "2024-3-7-1"] {
            assert!(
                matches!(normalize_date(value), Err(NormalizeError::InvalidDate(_))),
                "{value} should not parse"
            );
        }
        // One-digit day and month are still fine.
        assert_eq!(normalize_date("3/7/2024").unwrap(), "03/07/2024");
        assert_eq!(normalize_date("2024-3-7").unwrap(), "03/07/2024");
    }

    #[test]
    fn names_and_strings() {
        assert_eq!(normalize_name(" Smith-Jones "), "smithjones");
        assert_eq!(normalize_name("-"), "null");
        assert_eq!(normalize_name(""), "null");
        assert_eq!(normalize_string("  Sales  "), "sales");
        assert_eq!(normalize_string("   "), "null");
    }

    #[test]
    fn phone_and_email() {
        assert_eq!(normalize_phone("(555) 123-4567"), "05551234567");
        assert_eq!(normalize_phone("+1 555 123 4567 99"), "15551234567");
        assert_eq!(normalize_email(" Jo@Example.COM "), "jo@example.com");
        assert_eq!(normalize_phone(""), "null");
    }

    #[test]
    fn untyped_passes_through() {
        assert_eq!(normalize(" Active ", FieldType::Untyped).unwrap(), " Active ");
    }
}
