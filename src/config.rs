use chrono::Utc;

use crate::token::normalize::{self, FormInput};
use crate::token::{FormatMode, TokenInstanceConfig};

// -- App --
pub const PAGE_TITLE: &str = "countdown";
pub const DEFAULT_PORT: u16 = 3000;

pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

// -- Server --
pub const HANDLER_TIMEOUT_SECS: u64 = 10;

// -- Token --
pub const TOKEN_TYPE_ID: &str = "dynamic_date_difference_token";
pub const TOKEN_LABEL: &str = "Dynamic Date Difference Token";
pub const DEFAULT_TARGET_ISO: &str = "1970-01-01T00:00:00Z";
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const DEFAULT_REFRESH_MS: u32 = 1000;
/// Largest delay `setInterval` honors; browsers treat anything above as 1 ms.
pub const MAX_REFRESH_MS: u32 = i32::MAX as u32;
/// Years a canonical `%Y` can write as four digits.
pub const TARGET_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;
/// Fixed 365-day year. Not calendar aware.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

// -- Client runtime --
pub const RUNTIME_LIBRARY: &str = "dynamic_date_difference_token/runtime";
pub const RUNTIME_SCRIPT_PATH: &str = "/static/dynamic_date_difference_token.js";

/// Initial instance, read from `TOKEN_TARGET_DATETIME`, `TOKEN_REFRESH_MS` and
/// `TOKEN_FORMAT_MODE`. Every value goes through the same normalization as a
/// form submission, so bad env values fall back to defaults.
pub fn initial_instance() -> TokenInstanceConfig {
    let target = match std::env::var("TOKEN_TARGET_DATETIME") {
        Ok(raw) => FormInput::Text(raw),
        Err(_) => FormInput::Unsupported,
    };
    let normalized = normalize::normalize(&target, Utc::now());

    let refresh_speed_ms = std::env::var("TOKEN_REFRESH_MS")
        .map(|raw| normalize::normalize_speed(&raw))
        .unwrap_or(DEFAULT_REFRESH_MS);

    let format_mode = std::env::var("TOKEN_FORMAT_MODE")
        .ok()
        .and_then(|raw| raw.trim().parse::<FormatMode>().ok())
        .unwrap_or_default();

    TokenInstanceConfig {
        target_datetime: normalized.target_datetime,
        refresh_speed_ms,
        format_mode,
    }
}
