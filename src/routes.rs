use std::time::Duration;

use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::{
    CACHE_CONTROL, CONTENT_TYPE, HeaderName, HeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS,
};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::compression::CompressionLayer;

use crate::config;
use crate::render;
use crate::state::AppState;
use crate::token::FormatMode;
use crate::token::form::{self, FormSubmission};
use crate::token::normalize::{self, FormInput, NormalizedTarget};

// ── Router ──────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/config", get(config_form).post(submit_config))
        .route("/api/token", get(api_token))
        .route("/api/normalize", post(api_normalize))
        .route("/api/health", get(api_health))
        .route(config::RUNTIME_SCRIPT_PATH, get(runtime_script))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|_: tower::BoxError| async {
                    StatusCode::REQUEST_TIMEOUT
                }))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config::HANDLER_TIMEOUT_SECS,
                )))
                .layer(CompressionLayer::new()),
        )
}

// ── Security middleware ─────────────────────────────────────────────

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let h = response.headers_mut();
    h.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    h.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    h.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    h.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    response
}

// ── Pages ───────────────────────────────────────────────────────────

async fn index(State(state): State<AppState>) -> Response {
    let token = match state.token() {
        Ok(token) => token,
        Err(e) => return unavailable(e),
    };
    // Rendered per request: the value is only correct for this instant.
    html_response(StatusCode::OK, render::render_page(&*token, Utc::now()))
}

async fn config_form(State(state): State<AppState>) -> Response {
    let token = match state.token() {
        Ok(token) => token,
        Err(e) => return unavailable(e),
    };
    let form = form::build_configuration_form(&*token, Utc::now());
    html_response(StatusCode::OK, render::render_config_page(&form, None))
}

async fn submit_config(
    State(state): State<AppState>,
    Form(submission): Form<FormSubmission>,
) -> Response {
    let token = match state.token() {
        Ok(token) => token,
        Err(e) => return unavailable(e),
    };
    let now = Utc::now();
    match form::submit(&*token, &submission, now) {
        Ok(next) => {
            state.store(next);
            Redirect::to("/").into_response()
        }
        Err(error) => {
            tracing::warn!(kind = error.kind(), "configuration rejected");
            let form = form::build_configuration_form(&*token, now);
            html_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                render::render_config_page(&form, Some(error)),
            )
        }
    }
}

// ── API ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TokenView {
    value: String,
    target_datetime: String,
    format_mode: FormatMode,
    refresh_speed_ms: u32,
}

async fn api_token(State(state): State<AppState>) -> Response {
    let token = match state.token() {
        Ok(token) => token,
        Err(e) => return unavailable(e),
    };
    let config = token.config();
    Json(TokenView {
        value: token.value(Utc::now()),
        target_datetime: config.target_datetime.clone(),
        format_mode: config.format_mode,
        refresh_speed_ms: config.refresh_speed_ms,
    })
    .into_response()
}

#[derive(Deserialize)]
struct NormalizeRequest {
    #[serde(default)]
    target_datetime: serde_json::Value,
}

/// Lenient path only: any JSON value comes back as a canonical string.
async fn api_normalize(Json(request): Json<NormalizeRequest>) -> Json<NormalizedTarget> {
    let input = FormInput::from(request.target_datetime);
    Json(normalize::normalize(&input, Utc::now()))
}

async fn api_health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

// ── Static assets ───────────────────────────────────────────────────

async fn runtime_script() -> Response {
    Response::builder()
        .header(CONTENT_TYPE, "application/javascript")
        .header(CACHE_CONTROL, "no-cache")
        .body(Body::from(include_str!(
            "static/dynamic_date_difference_token.js"
        )))
        .expect("valid response")
}

// ── Response helpers ────────────────────────────────────────────────

fn html_response(status: StatusCode, html: String) -> Response {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CACHE_CONTROL, "no-store")
        .body(Body::from(html))
        .expect("valid response")
}

fn unavailable(error: impl std::fmt::Display) -> Response {
    tracing::error!(error = %error, "token unavailable");
    (StatusCode::INTERNAL_SERVER_ERROR, "token unavailable").into_response()
}
