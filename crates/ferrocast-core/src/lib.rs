//! # Ferrocast Core
//!
//! Daily price history, stationarity testing and ARIMA forecasting for a
//! single ticker.
//!
//! ## Overview
//!
//! - **Data sources**: the [`DataSource`] trait with a Yahoo Finance adapter
//!   and an offline synthetic adapter
//! - **Series preparation**: closing prices plus return and differenced series
//! - **Stationarity**: augmented Dickey-Fuller test with AIC lag selection
//! - **Forecasting**: ARIMA(5,1,0) fitted by conditional least squares, dated
//!   on business days
//! - **Presentation helpers**: SVG chart and JSON envelope
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo, synthetic) |
//! | [`arima`] | ARIMA(p, d, 0) estimation and forecasting |
//! | [`calendar`] | Business-day arithmetic |
//! | [`chart`] | SVG rendering of actual vs forecast prices |
//! | [`data_source`] | Data source trait and request types |
//! | [`domain`] | Domain models (Symbol, PriceRecord, Series) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`forecast`] | Fixed-order price forecaster |
//! | [`pipeline`] | One complete forecast run |
//! | [`prepare`] | Price, return and differenced series |
//! | [`settings`] | Environment configuration |
//! | [`stationarity`] | Stationarity verdicts |
//! | [`stats`] | Least squares and the ADF test |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrocast_core::{pipeline, ForecastParams, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let source = settings.data_source();
//!     let params = ForecastParams::parse("7203.T", "2024-01-01", "2025-11-01", 10)?;
//!
//!     let report = pipeline::run(source.as_ref(), &params).await?;
//!     println!("{}", report.price_verdict.message());
//!     for point in &report.forecast.points {
//!         println!("{} {:.2}", point.date, point.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every run either yields a [`ForecastReport`] or a [`PipelineError`] with a
//! stable code:
//!
//! ```rust
//! use ferrocast_core::PipelineError;
//!
//! fn describe(error: &PipelineError) -> &'static str {
//!     match error {
//!         PipelineError::NoData { .. } => "check the ticker",
//!         PipelineError::Source(source) if source.retryable() => "try again later",
//!         _ => error.code(),
//!     }
//! }
//! ```

pub mod adapters;
pub mod arima;
pub mod calendar;
pub mod chart;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod forecast;
pub mod http_client;
pub mod pipeline;
pub mod prepare;
pub mod settings;
pub mod source;
pub mod stationarity;
pub mod stats;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Adapter implementations
pub use adapters::{SyntheticAdapter, YahooAdapter};

// Data source trait and types
pub use data_source::{DataSource, HistoryRequest, SourceError, SourceErrorKind};

// Domain models
pub use domain::{
    format_date, parse_date, DateRange, Observation, PriceHistory, PriceRecord, Series, Symbol,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::ValidationError;

// Forecasting
pub use arima::{ArimaModel, ArimaOrder, ArimaSummary};
pub use forecast::{Forecast, ForecastError, ForecastPoint};
pub use stationarity::{test_stationarity, StationarityVerdict};
pub use stats::StatsError;

// Pipeline
pub use pipeline::{ForecastParams, ForecastReport, PipelineError, Stage};
pub use prepare::PreparedSeries;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Configuration
pub use settings::Settings;

// Source identifiers
pub use source::ProviderId;
