//! Turns operator input into the canonical `YYYY-MM-DDTHH:MM:SSZ` string.
//!
//! Two entry points share one parser. [`normalize`] is the lenient submit path
//! and always yields a value, substituting the epoch default on any failure.
//! [`validate_element`] is the strict form gate and reports why input was
//! rejected instead of substituting anything.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TargetDateTime;
use crate::config;

/// Offset layouts RFC 3339 parsing does not cover.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
/// Naive layouts tried after the offset ones. All are read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";
const COMPOSITE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const DEFAULT_TIME: &str = "00:00:00";

/// A value as submitted by the form layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    DateTime(DateTime<FixedOffset>),
    Composite {
        date: Option<String>,
        time: Option<String>,
    },
    Text(String),
    /// Null, numbers, booleans, arrays and other shapes the form never produces.
    Unsupported,
}

impl From<serde_json::Value> for FormInput {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => Self::Text(s),
            Value::Object(map) => {
                let field = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
                Self::Composite {
                    date: field("date"),
                    time: field("time"),
                }
            }
            _ => Self::Unsupported,
        }
    }
}

/// A stored configuration value as handed back to the form builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Text(String),
    DateTime(DateTime<FixedOffset>),
}

/// The persisted configuration layout: a single canonical string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTarget {
    pub target_datetime: String,
}

impl NormalizedTarget {
    fn from_target(target: TargetDateTime) -> Self {
        Self {
            target_datetime: target.canonical(),
        }
    }

    fn fallback() -> Self {
        Self {
            target_datetime: config::DEFAULT_TARGET_ISO.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The datetime is not valid.")]
    InvalidDateTime,
    #[error("The datetime format is not valid.")]
    InvalidDateTimeFormat,
    #[error("A valid datetime is required.")]
    DateTimeRequired,
}

impl ValidationError {
    pub fn kind(self) -> &'static str {
        match self {
            Self::InvalidDateTime => "invalid_datetime",
            Self::InvalidDateTimeFormat => "invalid_datetime_format",
            Self::DateTimeRequired => "datetime_required",
        }
    }
}

/// Form default. A stored string that no longer parses falls back to `now`;
/// nothing stored means no default.
pub fn render_default(raw: Option<&ConfigValue>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match raw? {
        ConfigValue::Text(s) if s.is_empty() => None,
        ConfigValue::Text(s) => Some(parse_utc(s, now).unwrap_or(now)),
        ConfigValue::DateTime(dt) => Some(dt.with_timezone(&Utc)),
    }
}

pub fn normalize(input: &FormInput, now: DateTime<Utc>) -> NormalizedTarget {
    let parsed = match input {
        FormInput::DateTime(dt) => TargetDateTime::new(dt.with_timezone(&Utc)),
        FormInput::Composite {
            date: Some(date),
            time,
        } if !date.is_empty() => {
            let time = time.as_deref().filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TIME);
            parse_composite(date, time)
        }
        FormInput::Text(s) => parse_utc(s, now).and_then(TargetDateTime::new),
        _ => None,
    };
    parsed.map_or_else(NormalizedTarget::fallback, NormalizedTarget::from_target)
}

pub fn validate_element(
    value: &FormInput,
    now: DateTime<Utc>,
) -> Result<TargetDateTime, ValidationError> {
    match value {
        FormInput::DateTime(dt) => {
            TargetDateTime::new(dt.with_timezone(&Utc)).ok_or(ValidationError::InvalidDateTime)
        }
        FormInput::Composite {
            date: Some(date),
            time: Some(time),
        } if !date.is_empty() && !time.is_empty() => {
            parse_composite(date, time).ok_or(ValidationError::InvalidDateTime)
        }
        FormInput::Text(s) if !s.is_empty() => parse_utc(s, now)
            .and_then(TargetDateTime::new)
            .ok_or(ValidationError::InvalidDateTimeFormat),
        _ => Err(ValidationError::DateTimeRequired),
    }
}

/// Refresh interval in milliseconds. Anything but an integer in
/// `1..=MAX_REFRESH_MS` yields the default.
pub fn normalize_speed(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|ms| (1..=config::MAX_REFRESH_MS).contains(ms))
        .unwrap_or(config::DEFAULT_REFRESH_MS)
}

/// Parse free-form text as a UTC instant. Offsets are converted, naive values
/// are taken as UTC, `now` resolves to the supplied instant. Years outside
/// 0000-9999 are rejected.
pub fn parse_utc(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    parse_instant(raw, now).filter(|dt| config::TARGET_YEARS.contains(&dt.year()))
}

fn parse_instant(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.eq_ignore_ascii_case("now") {
        return Some(now);
    }
    if let Some(secs) = s.strip_prefix('@') {
        return secs
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
    }
    if let Some(dt) = DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    }) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn parse_composite(date: &str, time: &str) -> Option<TargetDateTime> {
    let joined = format!("{} {}", date.trim(), time.trim());
    COMPOSITE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&joined, fmt).ok())
        .and_then(|naive| TargetDateTime::new(naive.and_utc()))
}
