//! Raw text → typed values.
//!
//! The loader keeps every cell as text; charts pick the interpretation they
//! need through these helpers.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::core::primitives::decimal_to_f64;
use crate::data::TabularRecord;
use crate::error::{ChartError, ChartResult};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a decimal number; blank or non-finite text yields `None`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses currency text such as `$1,234.56`, `1,234` or `-$12.50` exactly.
#[must_use]
pub fn parse_currency(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let cleaned: String = unsigned
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() || (negative && cleaned.starts_with(['-', '+'])) {
        return None;
    }
    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

/// Parses a count such as `12,345`.
#[must_use]
pub fn parse_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parses a date-like cell into a UTC timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD[ HH:MM[:SS]]` and a few slash variants;
/// date-only values are midnight UTC. Bare integers of 9+ digits are Unix
/// seconds, 13+ digits Unix milliseconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(time.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(time.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0).map(|time| time.and_utc());
        }
    }

    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.len() >= 9 && digits.bytes().all(|b| b.is_ascii_digit()) {
        let value: i64 = trimmed.parse().ok()?;
        return if digits.len() >= 13 {
            DateTime::from_timestamp_millis(value)
        } else {
            DateTime::from_timestamp(value, 0)
        };
    }
    None
}

impl TabularRecord {
    /// Raw text of a column that must be present.
    pub fn text(&self, field: &str) -> ChartResult<&str> {
        self.get(field).ok_or_else(|| self.missing(field))
    }

    /// Required numeric column.
    pub fn number(&self, field: &str) -> ChartResult<f64> {
        let raw = self.text(field)?;
        parse_number(raw).ok_or_else(|| self.invalid(field, raw, "a number"))
    }

    /// Numeric column where blank or unparseable cells become `NaN`.
    #[must_use]
    pub fn number_or_nan(&self, field: &str) -> f64 {
        self.get(field).and_then(parse_number).unwrap_or(f64::NAN)
    }

    /// Required currency column, exact.
    pub fn currency(&self, field: &str) -> ChartResult<Decimal> {
        let raw = self.text(field)?;
        parse_currency(raw).ok_or_else(|| self.invalid(field, raw, "a currency amount"))
    }

    /// Required currency column as the nearest `f64`.
    pub fn currency_f64(&self, field: &str) -> ChartResult<f64> {
        decimal_to_f64(self.currency(field)?, field)
    }

    /// Required date-like column.
    pub fn timestamp(&self, field: &str) -> ChartResult<DateTime<Utc>> {
        let raw = self.text(field)?;
        parse_timestamp(raw).ok_or_else(|| self.invalid(field, raw, "a date or timestamp"))
    }

    fn missing(&self, field: &str) -> ChartError {
        ChartError::invalid_value(field, format!("column missing in row {}", self.row()))
    }

    fn invalid(&self, field: &str, raw: &str, expected: &str) -> ChartError {
        ChartError::invalid_value(
            field,
            format!("expected {expected} in row {}, found {raw:?}", self.row()),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{parse_count, parse_currency, parse_number, parse_timestamp};

    #[test]
    fn number_rejects_blank_and_non_finite_text() {
        assert_eq!(parse_number(" 42.5 "), Some(42.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn currency_keeps_sign_and_rejects_double_sign() {
        assert_eq!(parse_currency("-$12.50"), Some(Decimal::new(-1250, 2)));
        assert_eq!(parse_currency("--$1"), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("$1.2.3"), None);
    }

    #[test]
    fn counts_accept_thousands_separators() {
        assert_eq!(parse_count("12,345"), Some(12_345));
        assert_eq!(parse_count("-1"), None);
    }

    #[test]
    fn timestamps_cover_observed_date_shapes() {
        let midnight = Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).single().expect("date");
        assert_eq!(parse_timestamp("2021-03-04"), Some(midnight));
        assert_eq!(parse_timestamp("03/04/2021"), Some(midnight));
        assert_eq!(parse_timestamp("2021-03-04T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2021-03-04 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("1614816000"), Some(midnight));
        assert_eq!(parse_timestamp("1614816000000"), Some(midnight));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2021"), None);
    }
}
