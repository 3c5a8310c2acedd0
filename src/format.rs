//! Label text for axes and tooltips.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// `October 14, 2026`
#[must_use]
pub fn long_date(time: DateTime<Utc>) -> String {
    time.format("%B %-d, %Y").to_string()
}

/// `2026-10-14`
#[must_use]
pub fn iso_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// `2026`
#[must_use]
pub fn year(time: DateTime<Utc>) -> String {
    time.format("%Y").to_string()
}

/// Date label style for tooltip titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// [`long_date`]
    #[default]
    Long,
    /// [`iso_date`]
    Iso,
    /// [`year`]
    Year,
}

impl DateStyle {
    #[must_use]
    pub fn render(self, time: DateTime<Utc>) -> String {
        match self {
            Self::Long => long_date(time),
            Self::Iso => iso_date(time),
            Self::Year => year(time),
        }
    }
}

/// `$1,234.56`; non-finite input renders as `—`.
#[must_use]
pub fn usd(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_owned();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    format!("{sign}${}.{fraction}", group_digits(whole))
}

/// Exact variant of [`usd`] for decimal amounts, rounding half away from zero.
#[must_use]
pub fn usd_decimal(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    format!("{sign}${}.{fraction}", group_digits(whole))
}

/// Thousands-grouped number with up to three fraction digits: `1,234,567.5`.
#[must_use]
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_owned();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{sign}{}", group_digits(whole))
    } else {
        format!("{sign}{}.{fraction}", group_digits(whole))
    }
}

/// Two significant digits with an SI suffix: `1.2M`, `12k`, `500m`.
#[must_use]
pub fn si_compact(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_owned();
    }
    if value == 0.0 {
        return "0.0".to_owned();
    }

    let magnitude = value.abs().log10().floor();
    let unit = 10f64.powf(magnitude - 1.0);
    let rounded = (value / unit).round() * unit;
    let exponent = rounded.abs().log10().floor() as i32;
    let tier = exponent.div_euclid(3).clamp(-8, 8);
    let scaled = rounded / 10f64.powi(tier * 3);
    let decimals = (1 - (exponent - tier * 3)).max(0) as usize;
    let prefix = SI_PREFIXES[(tier + 8) as usize];
    format!("{scaled:.decimals$}{prefix}")
}

/// `$` + [`si_compact`], the NFT volume axis format.
#[must_use]
pub fn usd_compact(value: f64) -> String {
    format!("${}", si_compact(value))
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
