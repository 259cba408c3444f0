//! Per-row derivations.
//!
//! Every function here is total: a value that cannot be computed comes back
//! as an empty string (or `None`) and the caller writes an empty cell.

use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, TimeZone, Timelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::AugmentConfig;
use crate::model::{DerivedColumn, DerivedFields, Row};
use crate::schema::{
    CLOSE_COLUMN, LOW_COLUMN, OPEN_COLUMN, PCT_CHANGE_PREV_CLOSE_COLUMN, TIMESTAMP_COLUMN,
};

const PERCENT_SCALE: u32 = 8;
// Widest coefficient a quantized percentage may carry: 28 significant digits.
const MAX_COEFFICIENT: u128 = 10_000_000_000_000_000_000_000_000_000;
pub const ZERO_PERCENT: &str = "0.00000000";

fn parse_decimal(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// `numerator / denominator * 100`, half-up to eight places. Values too wide
/// to carry all eight places within 28 significant digits yield `None`.
fn format_percent(numerator: Decimal, denominator: Decimal) -> Option<String> {
    if denominator.is_zero() {
        return None;
    }
    let percent = numerator
        .checked_div(denominator)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    let mut quantized =
        percent.round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    quantized.rescale(PERCENT_SCALE);
    if quantized.scale() != PERCENT_SCALE
        || quantized.mantissa().unsigned_abs() >= MAX_COEFFICIENT
    {
        return None;
    }
    Some(quantized.to_string())
}

fn percent_change(base: &str, current: &str) -> String {
    let (Some(base), Some(current)) = (parse_decimal(base), parse_decimal(current)) else {
        return String::new();
    };
    current
        .checked_sub(base)
        .and_then(|delta| format_percent(delta, base))
        .unwrap_or_default()
}

/// Candle body change relative to its own open.
pub fn format_percentage_from_open(open: &str, close: &str) -> String {
    percent_change(open, close)
}

/// Change relative to the previous candle's close.
pub fn format_percentage_from_prev_close(prev_close: &str, close: &str) -> String {
    percent_change(prev_close, close)
}

/// An upstream `pct_change_prev_close` wins, then the previous close, then
/// the row's own open.
pub fn percentage_change(row: &Row<'_>, prior_close: Option<&str>) -> String {
    let upstream = row.get(PCT_CHANGE_PREV_CLOSE_COLUMN).trim();
    if !upstream.is_empty() {
        return upstream.to_string();
    }

    let close = row.get(CLOSE_COLUMN);
    match prior_close {
        Some(prev) => format_percentage_from_prev_close(prev, close),
        None => format_percentage_from_open(row.get(OPEN_COLUMN), close),
    }
}

pub fn lower_wick_percent(open: &str, low: &str) -> String {
    let (Some(open), Some(low)) = (parse_decimal(open), parse_decimal(low)) else {
        return String::new();
    };
    if open <= Decimal::ZERO {
        return String::new();
    }
    if low >= open {
        return ZERO_PERCENT.to_string();
    }
    open.checked_sub(low)
        .and_then(|wick| format_percent(wick, open))
        .unwrap_or_default()
}

/// Render as `YYYY-MM-DDTHH:MM:SS[.ffffff]+HH:MM`. Years outside 1..=9999
/// have no such rendering and yield `None`.
pub fn format_iso8601<Tz>(dt: &DateTime<Tz>) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if !(1..=9999).contains(&dt.year()) {
        return None;
    }
    let micros = (dt.nanosecond() % 1_000_000_000) / 1_000;
    let fraction = if micros == 0 {
        String::new()
    } else {
        format!(".{micros:06}")
    };
    Some(format!(
        "{}{}{}",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        fraction,
        dt.format("%:z")
    ))
}

/// Epoch milliseconds to an ISO-8601 UTC string; empty when the input is not
/// an integer or falls outside the representable range.
pub fn normalize_time_utc(timestamp_millis: &str) -> String {
    timestamp_millis
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .and_then(|dt| format_iso8601(&dt))
        .unwrap_or_default()
}

pub fn synthetic_time(
    base: &DateTime<FixedOffset>,
    step_seconds: i64,
    row_index: u64,
) -> Option<DateTime<FixedOffset>> {
    let index = i64::try_from(row_index).ok()?;
    let offset = TimeDelta::try_seconds(step_seconds.checked_mul(index)?)?;
    base.checked_add_signed(offset)
}

/// Applies the derivations to one row, given the facts about the input
/// header that hold for the whole run.
#[derive(Debug, Clone)]
pub struct RowTransformer<'a> {
    config: &'a AugmentConfig,
    has_timestamp: bool,
    has_time_utc: bool,
}

impl<'a> RowTransformer<'a> {
    pub fn new(config: &'a AugmentConfig, has_timestamp: bool, has_time_utc: bool) -> Self {
        Self {
            config,
            has_timestamp,
            has_time_utc,
        }
    }

    pub fn derive(
        &self,
        row: &Row<'_>,
        prior_close: Option<&str>,
        row_index: u64,
    ) -> DerivedFields {
        DerivedFields {
            percentage: percentage_change(row, prior_close),
            lower_wick_pct: lower_wick_percent(row.get(OPEN_COLUMN), row.get(LOW_COLUMN)),
            time_utc: self.time_utc(row, row_index),
        }
    }

    fn time_utc(&self, row: &Row<'_>, row_index: u64) -> String {
        if !self.config.add_time_utc {
            // Without --add-time-utc the schema has no time_utc column, so this
            // value is never written.
            return if self.has_time_utc {
                row.get(DerivedColumn::TimeUtc.canonical_name()).to_string()
            } else {
                String::new()
            };
        }

        if self.has_timestamp {
            return normalize_time_utc(row.get(TIMESTAMP_COLUMN));
        }

        match &self.config.start_time_utc {
            Some(base) => synthetic_time(base, self.config.step_seconds, row_index)
                .and_then(|dt| format_iso8601(&dt))
                .unwrap_or_default(),
            None => String::new(),
        }
    }
}
