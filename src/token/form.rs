//! Configuration form: the field descriptor handed to the form builder and the
//! submit pipeline that turns a posted form into a new instance config.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::normalize::{self, ConfigValue, FormInput, ValidationError};
use super::{DynamicToken, FormatMode, TargetDateTime, TokenInstanceConfig};

pub const TARGET_FIELD: &str = "target_datetime";
pub const TARGET_TITLE: &str = "Target date/time (UTC)";
pub const TARGET_DESCRIPTION: &str = "Stored as ISO8601 UTC (e.g., 2030-01-01T00:00:00Z).";
pub const FORM_TIMEZONE: &str = "UTC";

pub type Validator = fn(&FormInput, DateTime<Utc>) -> Result<TargetDateTime, ValidationError>;

/// A required date-time field fixed to UTC.
pub struct DateTimeField {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub timezone: &'static str,
    pub default_value: Option<DateTime<Utc>>,
    pub validate: Validator,
}

pub struct ConfigurationForm {
    pub target: DateTimeField,
    pub refresh_speed_ms: u32,
    pub format_mode: FormatMode,
}

pub fn build_configuration_form(token: &dyn DynamicToken, now: DateTime<Utc>) -> ConfigurationForm {
    let config = token.config();
    let stored = ConfigValue::Text(config.target_datetime.clone());
    ConfigurationForm {
        target: DateTimeField {
            name: TARGET_FIELD,
            title: TARGET_TITLE,
            description: TARGET_DESCRIPTION,
            required: true,
            timezone: FORM_TIMEZONE,
            default_value: token.render_default(Some(&stored), now),
            validate: normalize::validate_element,
        },
        refresh_speed_ms: config.refresh_speed_ms,
        format_mode: config.format_mode,
    }
}

/// Fields posted by the configuration form. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub refresh_speed_ms: Option<String>,
    #[serde(default)]
    pub format_mode: Option<String>,
}

impl FormSubmission {
    pub fn target_input(&self) -> FormInput {
        FormInput::Composite {
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

/// Strict gate first, then the lenient normalization that produces the stored
/// value. Speed falls back to the default, an unknown mode keeps the current one.
pub fn submit(
    token: &dyn DynamicToken,
    form: &FormSubmission,
    now: DateTime<Utc>,
) -> Result<TokenInstanceConfig, ValidationError> {
    let input = form.target_input();
    token.validate_element(&input, now)?;
    let normalized = token.normalize(&input, now);

    let current = token.config();
    let refresh_speed_ms = form
        .refresh_speed_ms
        .as_deref()
        .map_or(current.refresh_speed_ms, normalize::normalize_speed);
    let format_mode = form
        .format_mode
        .as_deref()
        .and_then(|m| m.trim().parse().ok())
        .unwrap_or(current.format_mode);

    Ok(TokenInstanceConfig {
        target_datetime: normalized.target_datetime,
        refresh_speed_ms,
        format_mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::date_difference::DateDifferenceToken;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap()
    }

    fn token(target: &str) -> DateDifferenceToken {
        DateDifferenceToken::new(TokenInstanceConfig {
            target_datetime: target.to_string(),
            refresh_speed_ms: 750,
            format_mode: FormatMode::SecondsSignedInteger,
        })
    }

    fn submission(date: &str, time: &str) -> FormSubmission {
        FormSubmission {
            date: Some(date.to_string()),
            time: Some(time.to_string()),
            ..FormSubmission::default()
        }
    }

    #[test]
    fn descriptor_prefills_from_stored_value() {
        let form = build_configuration_form(&token("2030-01-01T00:00:00Z"), now());
        assert_eq!(form.target.name, "target_datetime");
        assert!(form.target.required);
        assert_eq!(form.target.timezone, "UTC");
        assert_eq!(
            form.target.default_value,
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(form.refresh_speed_ms, 750);
        assert_eq!(form.format_mode, FormatMode::SecondsSignedInteger);

        let empty = FormInput::Text(String::new());
        assert_eq!(
            (form.target.validate)(&empty, now()),
            Err(ValidationError::DateTimeRequired)
        );
    }

    #[test]
    fn descriptor_falls_back_to_now_for_corrupt_storage() {
        let form = build_configuration_form(&token("corrupt"), now());
        assert_eq!(form.target.default_value, Some(now()));
    }

    #[test]
    fn submit_stores_canonical_value() {
        let mut form = submission("2030-01-01", "12:00:00");
        form.refresh_speed_ms = Some("250".into());
        form.format_mode = Some("fractional_years_unsigned_8dp".into());

        let next = submit(&token("2020-01-01T00:00:00Z"), &form, now()).unwrap();
        assert_eq!(next.target_datetime, "2030-01-01T12:00:00Z");
        assert_eq!(next.refresh_speed_ms, 250);
        assert_eq!(next.format_mode, FormatMode::FractionalYearsUnsigned8dp);
    }

    #[test]
    fn submit_keeps_settings_when_fields_are_missing_or_bad() {
        let mut form = submission("2030-01-01", "12:00");
        form.format_mode = Some("weeks".into());
        let next = submit(&token("2020-01-01T00:00:00Z"), &form, now()).unwrap();
        assert_eq!(next.target_datetime, "2030-01-01T12:00:00Z");
        assert_eq!(next.refresh_speed_ms, 750);
        assert_eq!(next.format_mode, FormatMode::SecondsSignedInteger);

        form.refresh_speed_ms = Some("soon".into());
        let next = submit(&token("2020-01-01T00:00:00Z"), &form, now()).unwrap();
        assert_eq!(next.refresh_speed_ms, 1000);
    }

    #[test]
    fn submit_rejects_incomplete_or_invalid_input() {
        let t = token("2020-01-01T00:00:00Z");
        assert_eq!(
            submit(&t, &FormSubmission::default(), now()),
            Err(ValidationError::DateTimeRequired)
        );
        assert_eq!(
            submit(&t, &submission("2030-01-01", ""), now()),
            Err(ValidationError::DateTimeRequired)
        );
        assert_eq!(
            submit(&t, &submission("2030-02-31", "00:00:00"), now()),
            Err(ValidationError::InvalidDateTime)
        );
    }
}
