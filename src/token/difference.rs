//! Text for the gap between a target instant and the current time.
//!
//! Everything here is pure. The browser runtime carries its own copy of the
//! formatter, and `static/render_cases.json` is run against both.

use chrono::{DateTime, Timelike, Utc};

use super::FormatMode;
use crate::config;

// Duplicated in static/dynamic_date_difference_token.js for client-side refresh; keep both in sync.
const FRACTION_DIGITS: u32 = 8;
const FRACTION_SCALE: u128 = 10u128.pow(FRACTION_DIGITS);

/// Render the difference between `target` and `now`. Pure: the same inputs
/// always give the same text. An unparseable target counts as the Unix epoch.
pub fn render(target: &str, now: DateTime<Utc>, mode: FormatMode) -> String {
    let delta = delta_seconds(parse_target(target), now);
    match mode {
        FormatMode::SecondsSignedInteger => delta.to_string(),
        FormatMode::FractionalYearsUnsigned8dp => fractional_years(delta.unsigned_abs()),
    }
}

/// RFC 3339 only. Leap seconds are refused because `Date.parse` refuses them.
pub fn parse_target(target: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(target.trim())
        .ok()
        .filter(|dt| dt.nanosecond() < 1_000_000_000)
        .map_or(DateTime::UNIX_EPOCH, |dt| dt.with_timezone(&Utc))
}

/// Signed whole seconds from `now` until `target`, truncated toward zero.
pub fn delta_seconds(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    target.signed_duration_since(now).num_seconds()
}

/// `secs / 31536000` to 8 places, rounding half away from zero. Exact integer
/// arithmetic so the browser (BigInt) and the server agree digit for digit.
pub fn fractional_years(secs: u64) -> String {
    let divisor = config::SECONDS_PER_YEAR as u128;
    let scaled = secs as u128 * FRACTION_SCALE;
    let mut units = scaled / divisor;
    if (scaled % divisor) * 2 >= divisor {
        units += 1;
    }
    format!(
        "{}.{:0width$}",
        units / FRACTION_SCALE,
        units % FRACTION_SCALE,
        width = FRACTION_DIGITS as usize
    )
}
