pub mod date_difference;
pub mod difference;
pub mod form;
pub mod normalize;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use normalize::{ConfigValue, FormInput, NormalizedTarget, ValidationError};

/// How the difference is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    /// Truncated whole seconds, sign preserved.
    SecondsSignedInteger,
    /// `|seconds| / 31536000` with exactly 8 fractional digits.
    #[default]
    #[serde(rename = "fractional_years_unsigned_8dp")]
    FractionalYearsUnsigned8dp,
}

impl FormatMode {
    pub const ALL: [FormatMode; 2] = [
        FormatMode::SecondsSignedInteger,
        FormatMode::FractionalYearsUnsigned8dp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SecondsSignedInteger => "seconds_signed_integer",
            Self::FractionalYearsUnsigned8dp => "fractional_years_unsigned_8dp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SecondsSignedInteger => "seconds (signed)",
            Self::FractionalYearsUnsigned8dp => "years (unsigned, 8 decimals)",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format mode: {0}")]
pub struct UnknownFormatMode(String);

impl FromStr for FormatMode {
    type Err = UnknownFormatMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownFormatMode(s.to_string()))
    }
}

/// One configured token: one target, one refresh speed, one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInstanceConfig {
    #[serde(default = "default_target")]
    pub target_datetime: String,
    #[serde(default = "default_refresh_ms")]
    pub refresh_speed_ms: u32,
    #[serde(default)]
    pub format_mode: FormatMode,
}

fn default_target() -> String {
    config::DEFAULT_TARGET_ISO.to_string()
}

fn default_refresh_ms() -> u32 {
    config::DEFAULT_REFRESH_MS
}

impl Default for TokenInstanceConfig {
    fn default() -> Self {
        Self {
            target_datetime: default_target(),
            refresh_speed_ms: default_refresh_ms(),
            format_mode: FormatMode::default(),
        }
    }
}

/// A UTC instant at whole-second precision. `Display` is the canonical
/// `YYYY-MM-DDTHH:MM:SSZ` form, so the year must fit in four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TargetDateTime(DateTime<Utc>);

impl TargetDateTime {
    pub fn new(instant: DateTime<Utc>) -> Option<Self> {
        config::TARGET_YEARS
            .contains(&instant.year())
            .then(|| Self(instant.trunc_subsecs(0)))
    }

    pub fn epoch() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }

    pub fn canonical(&self) -> String {
        self.0.format(config::CANONICAL_FORMAT).to_string()
    }
}

impl fmt::Display for TargetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(config::CANONICAL_FORMAT))
    }
}

/// Capability set every registered token type provides to the host.
pub trait DynamicToken: Send + Sync {
    fn id(&self) -> &'static str;

    fn label(&self) -> &'static str;

    /// Default value for the configuration form, or `None` when nothing is stored.
    fn render_default(&self, raw: Option<&ConfigValue>, now: DateTime<Utc>)
    -> Option<DateTime<Utc>>;

    /// Lenient submit path. Always produces a canonical value.
    fn normalize(&self, input: &FormInput, now: DateTime<Utc>) -> NormalizedTarget;

    /// Strict form-validation gate.
    fn validate_element(
        &self,
        value: &FormInput,
        now: DateTime<Utc>,
    ) -> Result<TargetDateTime, ValidationError>;

    /// Rendered text for `now`.
    fn value(&self, now: DateTime<Utc>) -> String;

    /// Attributes the host embeds on the token element.
    fn extra_attributes(&self) -> Vec<(&'static str, String)>;

    /// Client libraries the host must attach alongside the markup.
    fn attachments(&self) -> &'static [&'static str];

    fn config(&self) -> &TokenInstanceConfig;
}
