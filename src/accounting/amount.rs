use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

pub const PRECISION: u32 = 2;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_PREFIX_LEN: usize = 10;

/// Rounds half away from zero to cents, keeping a fixed scale of 2.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRECISION);
    rounded
}

/// Blank means zero. Both `.` and `,` are accepted as decimal separator.
pub fn parse_amount(value: &str) -> Result<Decimal, rust_decimal::Error> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(round_cents(Decimal::ZERO));
    }

    let normalized = value.replace(',', ".");
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map(round_cents)
}

/// Only the leading `YYYY-MM-DD` is read, so `2025-10-20 18:13:20 +0200` is the 20th.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let prefix = value.get(..DATE_PREFIX_LEN).unwrap_or(value);
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

pub fn is_reduced_rate(tax_name: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| tax_name.contains(marker.as_str()))
}
