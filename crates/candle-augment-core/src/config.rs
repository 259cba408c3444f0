use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::errors::{AugmentError, Result};

pub const DEFAULT_STEP_SECONDS: i64 = 60;

/// Run-wide switches. Built once before the pipeline starts and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentConfig {
    pub add_time_utc: bool,
    pub replace_timestamp: bool,
    pub start_time_utc: Option<DateTime<FixedOffset>>,
    pub step_seconds: i64,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            add_time_utc: false,
            replace_timestamp: false,
            start_time_utc: None,
            step_seconds: DEFAULT_STEP_SECONDS,
        }
    }
}

impl AugmentConfig {
    pub fn new(
        add_time_utc: bool,
        replace_timestamp: bool,
        start_time_utc: Option<&str>,
        step_seconds: i64,
    ) -> Result<Self> {
        let start_time_utc = start_time_utc.map(parse_start_time).transpose()?;
        Ok(Self {
            add_time_utc,
            replace_timestamp,
            start_time_utc,
            step_seconds,
        })
    }
}

/// Parse the seed for synthetic candle times.
///
/// Values carrying an offset (`Z`, `+02:00`) keep it. Naive date-times and
/// bare dates are taken as UTC.
pub fn parse_start_time(value: &str) -> Result<DateTime<FixedOffset>> {
    static OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%:z"];
    static NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().fixed_offset());
        }
    }

    Err(AugmentError::InvalidStartTime {
        value: value.to_string(),
    })
}
