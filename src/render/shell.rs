use maud::{Markup, PreEscaped, html};

use crate::config;

pub fn page_shell(content: Markup) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="theme-color" content="#0a0a0a";
                meta name="description" content="Live date difference token";
                title { (config::PAGE_TITLE) }
                style { (PreEscaped(include_str!("../static/common.css"))) }
            }
            body {
                a.skip-link href="#main-content" { "Skip to content" }
                (content)
            }
        }
    }
}

/// Script tags for the client libraries a token declares.
pub fn attachments(libraries: &[&str]) -> Markup {
    html! {
        @for library in libraries {
            @if let Some(src) = library_script(library) {
                script src=(src) defer {}
            }
        }
    }
}

fn library_script(library: &str) -> Option<&'static str> {
    match library {
        config::RUNTIME_LIBRARY => Some(config::RUNTIME_SCRIPT_PATH),
        _ => {
            tracing::warn!(library, "no script registered for library");
            None
        }
    }
}
