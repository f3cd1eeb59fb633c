//! One forecast run: fetch, prepare, test twice, fit and forecast.
//!
//! Every call to [`run`] is independent. Nothing is cached between runs, so
//! identical parameters against unchanged provider data produce identical
//! reports.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::data_source::{DataSource, HistoryRequest, SourceError};
use crate::forecast::{forecast, Forecast, ForecastError};
use crate::prepare::{prepare, PreparedSeries};
use crate::stationarity::{test_stationarity, StationarityVerdict};
use crate::stats::StatsError;
use crate::{DateRange, PriceRecord, ProviderId, Series, Symbol, ValidationError};

pub const MIN_HORIZON: usize = 5;
pub const MAX_HORIZON: usize = 60;
pub const DEFAULT_HORIZON: usize = 10;
pub const PREVIEW_ROWS: usize = 5;

pub const NO_DATA_MESSAGE: &str = "No data found! Please check ticker name.";
pub const SUCCESS_MESSAGE: &str = "Forecast generated successfully!";

/// Validated user inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastParams {
    pub symbol: Symbol,
    pub range: DateRange,
    pub horizon: usize,
}

impl ForecastParams {
    pub fn new(symbol: Symbol, range: DateRange, horizon: usize) -> Result<Self, ValidationError> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&horizon) {
            return Err(ValidationError::HorizonOutOfRange {
                value: horizon,
                min: MIN_HORIZON,
                max: MAX_HORIZON,
            });
        }
        Ok(Self {
            symbol,
            range,
            horizon,
        })
    }

    /// Build parameters from raw form or command-line text.
    pub fn parse(ticker: &str, start: &str, end: &str, horizon: usize) -> Result<Self, ValidationError> {
        Self::new(Symbol::parse(ticker)?, DateRange::parse(start, end)?, horizon)
    }
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Prepare,
    PriceStationarity,
    DifferenceStationarity,
    Forecast,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::PriceStationarity => "price_stationarity",
            Self::DifferenceStationarity => "difference_stationarity",
            Self::Forecast => "forecast",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("No data found! Please check ticker name.")]
    NoData { symbol: Symbol },
    #[error("insufficient data for {stage}: {required} observations required, {actual} available")]
    InsufficientData {
        stage: Stage,
        required: usize,
        actual: usize,
    },
    #[error("{stage} failed: {reason}")]
    FitFailure { stage: Stage, reason: String },
    #[error("market data unavailable: {0}")]
    Source(#[from] SourceError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PipelineError {
    pub(crate) fn fit_failure(stage: Stage, reason: impl Into<String>) -> Self {
        Self::FitFailure {
            stage,
            reason: reason.into(),
        }
    }

    fn from_stats(stage: Stage, error: StatsError) -> Self {
        match error {
            StatsError::InsufficientData { required, actual } => Self::InsufficientData {
                stage,
                required,
                actual,
            },
            other => Self::fit_failure(stage, other.to_string()),
        }
    }

    fn from_forecast(error: ForecastError) -> Self {
        match error {
            ForecastError::Horizon {
                horizon,
                series_len,
            } => Self::InsufficientData {
                stage: Stage::Forecast,
                required: horizon + 1,
                actual: series_len,
            },
            ForecastError::Model(stats) => Self::from_stats(Stage::Forecast, stats),
        }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoData { .. } => "no_data",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::FitFailure { .. } => "fit_failure",
            Self::Source(_) => "source_unavailable",
            Self::Validation(_) => "invalid_input",
        }
    }
}

/// Everything the presenters need from one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub symbol: Symbol,
    pub range: DateRange,
    pub horizon: usize,
    pub source: ProviderId,
    pub record_count: usize,
    /// Earliest rows of the raw history.
    pub preview: Vec<PriceRecord>,
    pub prices: Series,
    pub returns: Series,
    pub differences: Series,
    pub price_verdict: StationarityVerdict,
    pub difference_verdict: StationarityVerdict,
    pub forecast: Forecast,
}

impl ForecastReport {
    pub const fn message(&self) -> &'static str {
        SUCCESS_MESSAGE
    }
}

/// Execute one full run against `source`.
pub async fn run(
    source: &dyn DataSource,
    params: &ForecastParams,
) -> Result<ForecastReport, PipelineError> {
    info!(
        symbol = %params.symbol,
        range = %params.range,
        horizon = params.horizon,
        source = %source.id(),
        "fetching daily history"
    );

    let request = HistoryRequest::new(params.symbol.clone(), params.range);
    let history = source.daily_history(request).await.map_err(|error| {
        warn!(code = error.code(), %error, "history fetch failed");
        PipelineError::Source(error)
    })?;

    if history.is_empty() {
        warn!(symbol = %params.symbol, "provider returned no rows");
        return Err(PipelineError::NoData {
            symbol: params.symbol.clone(),
        });
    }

    let PreparedSeries {
        prices,
        returns,
        differences,
    } = prepare(&history)?;
    info!(
        prices = prices.len(),
        differences = differences.len(),
        "prepared series"
    );

    let price_verdict = test_stationarity(&prices.values())
        .map_err(|error| failed(PipelineError::from_stats(Stage::PriceStationarity, error)))?;
    info!(
        stationary = price_verdict.stationary,
        p_value = price_verdict.p_value,
        "price stationarity"
    );

    let difference_verdict = test_stationarity(&differences.values()).map_err(|error| {
        failed(PipelineError::from_stats(
            Stage::DifferenceStationarity,
            error,
        ))
    })?;
    info!(
        stationary = difference_verdict.stationary,
        p_value = difference_verdict.p_value,
        "difference stationarity"
    );

    let forecast = forecast(&prices, params.horizon)
        .map_err(|error| failed(PipelineError::from_forecast(error)))?;
    info!(
        points = forecast.len(),
        sigma2 = forecast.model.sigma2,
        "forecast generated"
    );

    Ok(ForecastReport {
        symbol: params.symbol.clone(),
        range: params.range,
        horizon: params.horizon,
        source: source.id(),
        record_count: history.len(),
        preview: history.head(PREVIEW_ROWS).to_vec(),
        prices,
        returns,
        differences,
        price_verdict,
        difference_verdict,
        forecast,
    })
}

fn failed(error: PipelineError) -> PipelineError {
    warn!(code = error.code(), %error, "pipeline stage failed");
    error
}
