use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{ChartError, ChartResult};

/// Converts an exact decimal amount into the nearest `f64`.
///
/// Goes through the decimal's canonical text so the result is the correctly
/// rounded float for that literal.
pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value
        .normalize()
        .to_string()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            ChartError::invalid_value(field_name, format!("{value} cannot be represented as f64"))
        })
}

/// Unix milliseconds as the numeric domain of time scales.
#[must_use]
pub fn datetime_to_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Inverse of [`datetime_to_millis`], rounding to the nearest millisecond.
pub fn millis_to_datetime(millis: f64) -> ChartResult<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return Err(ChartError::invalid_value(
            "timestamp",
            "millisecond value must be finite",
        ));
    }
    DateTime::from_timestamp_millis(millis.round() as i64).ok_or_else(|| {
        ChartError::invalid_value("timestamp", format!("{millis} ms is outside the calendar range"))
    })
}
