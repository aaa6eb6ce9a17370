use chrono::{DateTime, Utc};
use maud::{Markup, html};

use crate::refresh::ATTR_TARGET;
use crate::token::DynamicToken;

/// The token element: server-rendered value plus everything the browser
/// runtime needs to keep it ticking without a round trip.
pub fn render_token(token: &dyn DynamicToken, now: DateTime<Utc>) -> Markup {
    let config = token.config();
    let target = token
        .extra_attributes()
        .into_iter()
        .find(|(name, _)| *name == ATTR_TARGET)
        .map(|(_, value)| value)
        .unwrap_or_else(|| config.target_datetime.clone());

    html! {
        span.dynamic-token
            data-token-type-id=(token.id())
            data-target-datetime=(target)
            data-format-mode=(config.format_mode)
            data-speed-ms=(config.refresh_speed_ms)
        {
            (token.value(now))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::{ATTR_FORMAT_MODE, ATTR_SPEED, ATTR_TOKEN_TYPE};
    use crate::token::date_difference::DateDifferenceToken;
    use crate::token::{FormatMode, TokenInstanceConfig};
    use chrono::TimeZone;

    #[test]
    fn markup_carries_the_attribute_contract() {
        let token = DateDifferenceToken::new(TokenInstanceConfig {
            target_datetime: "2030-01-01T00:00:10Z".into(),
            refresh_speed_ms: 250,
            format_mode: FormatMode::SecondsSignedInteger,
        });
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let html = render_token(&token, now).into_string();

        for expected in [
            format!("{ATTR_TOKEN_TYPE}=\"dynamic_date_difference_token\""),
            format!("{ATTR_TARGET}=\"2030-01-01T00:00:10Z\""),
            format!("{ATTR_FORMAT_MODE}=\"seconds_signed_integer\""),
            format!("{ATTR_SPEED}=\"250\""),
        ] {
            assert!(html.contains(&expected), "missing {expected} in {html}");
        }
        assert!(html.contains(">10</span>"), "{html}");
        assert!(html.contains("class=\"dynamic-token\""), "{html}");
    }
}
