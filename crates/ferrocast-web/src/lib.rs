//! # Ferrocast Web
//!
//! Browser form and JSON API in front of the forecast pipeline.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | Input form with default values |
//! | `POST /forecast` | Form submission, answers with a rendered report |
//! | `POST /api/forecast` | JSON request, answers with an [`Envelope`] |
//! | `GET /healthz` | Liveness probe |

pub mod error;
pub mod html;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use ferrocast_core::pipeline::{self, DEFAULT_HORIZON};
use ferrocast_core::{
    DataSource, Envelope, EnvelopeMeta, ForecastParams, ForecastReport, ProviderId,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::WebError;
use html::FormValues;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

/// Fields posted by the HTML form. Every value arrives as text.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastForm {
    pub ticker: String,
    pub start: String,
    pub end: String,
    pub horizon: String,
}

impl From<ForecastForm> for FormValues {
    fn from(form: ForecastForm) -> Self {
        Self {
            ticker: form.ticker,
            start: form.start,
            end: form.end,
            horizon: form.horizon,
        }
    }
}

/// Body of `POST /api/forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    pub ticker: String,
    pub start: String,
    pub end: String,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/forecast", post(forecast_form))
        .route("/api/forecast", post(forecast_api))
        .route("/healthz", get(healthz))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Advisory notes attached to a successful report.
pub fn report_warnings(report: &ForecastReport) -> Vec<String> {
    let mut warnings = Vec::new();
    if !report.difference_verdict.stationary {
        warnings.push(String::from(
            "differenced series is still NOT stationary; d=1 may be too low",
        ));
    }
    warnings
}

async fn index() -> Html<String> {
    Html(html::index_page(&FormValues::default()))
}

async fn forecast_form(
    State(state): State<AppState>,
    Form(form): Form<ForecastForm>,
) -> Html<String> {
    let values = FormValues::from(form);
    match run_form(state.source.as_ref(), &values).await {
        Ok(report) => Html(html::report_page(&values, &report, &report_warnings(&report))),
        Err(error) => Html(html::error_page(&values, &error.to_string())),
    }
}

async fn run_form(source: &dyn DataSource, values: &FormValues) -> Result<ForecastReport, WebError> {
    let horizon = values
        .horizon
        .trim()
        .parse::<usize>()
        .map_err(|_| WebError::InvalidHorizon {
            value: values.horizon.clone(),
        })?;
    let params = ForecastParams::parse(&values.ticker, &values.start, &values.end, horizon)?;
    Ok(pipeline::run(source, &params).await?)
}

async fn forecast_api(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Response {
    let source = state.source.id();
    let started = Instant::now();

    let params = match ForecastParams::parse(
        &request.ticker,
        &request.start,
        &request.end,
        request.horizon,
    ) {
        Ok(params) => params,
        Err(error) => return WebError::from(error).into_envelope(source, elapsed_ms(started)),
    };

    match pipeline::run(state.source.as_ref(), &params).await {
        Ok(report) => {
            let mut meta = EnvelopeMeta::new(source, elapsed_ms(started));
            for warning in report_warnings(&report) {
                meta.push_warning(warning);
            }
            info!(symbol = %report.symbol, points = report.forecast.len(), "api forecast served");
            (StatusCode::OK, Json(Envelope::success(meta, report))).into_response()
        }
        Err(error) => WebError::from(error).into_envelope(source, elapsed_ms(started)),
    }
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    let source: ProviderId = state.source.id();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "source": source,
    }))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
