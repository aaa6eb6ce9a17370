use chrono::{DateTime, Utc};
use maud::html;

use super::shell::{attachments, page_shell};
use super::token::render_token;
use crate::token::DynamicToken;

pub fn render_page(token: &dyn DynamicToken, now: DateTime<Utc>) -> String {
    let config = token.config();
    page_shell(html! {
        main #main-content .countdown {
            header.countdown-header {
                h1 { (token.label()) }
                a.settings-link href="/config" { "configure" }
            }
            p.countdown-value { (render_token(token, now)) }
            dl.countdown-meta {
                dt { "target" }
                dd { time datetime=(config.target_datetime) { (config.target_datetime) } }
                dt { "format" }
                dd { (config.format_mode.label()) }
                dt { "refresh" }
                dd { (config.refresh_speed_ms) " ms" }
            }
        }
        (attachments(token.attachments()))
    })
    .into_string()
}
