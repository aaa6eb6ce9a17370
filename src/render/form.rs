use maud::html;

use super::shell::page_shell;
use crate::token::FormatMode;
use crate::token::form::ConfigurationForm;
use crate::token::normalize::ValidationError;

pub fn render_config_page(form: &ConfigurationForm, error: Option<ValidationError>) -> String {
    let field = &form.target;
    let date = field.default_value.map(|d| d.format("%Y-%m-%d").to_string());
    let time = field.default_value.map(|d| d.format("%H:%M:%S").to_string());

    page_shell(html! {
        main #main-content .settings {
            header.settings-header {
                a href="/" { "← countdown" }
                h1 { "configure" }
            }
            @if let Some(error) = error {
                p.form-error role="alert" { (error) }
            }
            form method="post" action="/config" {
                fieldset.settings-section {
                    legend.settings-label { (field.title) }
                    input #date type="date" name="date" aria-label="date"
                        required[field.required] value=[date];
                    input #time type="time" name="time" step="1" aria-label="time"
                        required[field.required] value=[time];
                    span.timezone { (field.timezone) }
                    small.muted { (field.description) }
                }
                fieldset.settings-section {
                    label.settings-label for="refresh_speed_ms" { "refresh interval (ms)" }
                    input #refresh_speed_ms type="number" name="refresh_speed_ms" min="1"
                        value=(form.refresh_speed_ms);
                }
                fieldset.settings-section {
                    label.settings-label for="format_mode" { "format" }
                    select #format_mode name="format_mode" {
                        @for mode in FormatMode::ALL {
                            option value=(mode) selected[mode == form.format_mode] { (mode.label()) }
                        }
                    }
                }
                button.save-btn type="submit" { "save" }
            }
        }
    })
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::date_difference::DateDifferenceToken;
    use crate::token::form::build_configuration_form;
    use crate::token::{FormatMode, TokenInstanceConfig};
    use chrono::{TimeZone, Utc};

    fn form(target: &str) -> ConfigurationForm {
        let token = DateDifferenceToken::new(TokenInstanceConfig {
            target_datetime: target.into(),
            refresh_speed_ms: 1000,
            format_mode: FormatMode::SecondsSignedInteger,
        });
        build_configuration_form(&token, Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap())
    }

    #[test]
    fn prefills_date_and_time() {
        let html = render_config_page(&form("2030-01-01T06:05:04Z"), None);
        assert!(html.contains("value=\"2030-01-01\""), "{html}");
        assert!(html.contains("value=\"06:05:04\""), "{html}");
        assert!(html.contains("value=\"seconds_signed_integer\" selected"), "{html}");
        assert!(!html.contains("role=\"alert\""), "{html}");
    }

    #[test]
    fn shows_validation_message() {
        let html = render_config_page(
            &form("2030-01-01T00:00:00Z"),
            Some(ValidationError::InvalidDateTime),
        );
        assert!(html.contains("The datetime is not valid."), "{html}");
    }
}
