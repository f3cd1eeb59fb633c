use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

use crate::arima::{ArimaModel, ArimaOrder, ArimaSummary};
use crate::calendar::next_business_days;
use crate::stats::StatsError;
use crate::Series;

/// Fixed model order applied to every closing-price series.
pub const MODEL_ORDER: ArimaOrder = ArimaOrder::new(5, 1, 0);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("forecast horizon {horizon} must be between 1 and {}", .series_len.saturating_sub(1))]
    Horizon { horizon: usize, series_len: usize },
    #[error(transparent)]
    Model(#[from] StatsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: Date,
    pub value: f64,
}

/// Point forecasts dated on the business days following the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub points: Vec<ForecastPoint>,
    pub model: ArimaSummary,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }
}

/// Fit ARIMA(5,1,0) to `series` and forecast `horizon` business days ahead.
pub fn forecast(series: &Series, horizon: usize) -> Result<Forecast, ForecastError> {
    let last_date = match series.last_date() {
        Some(date) if horizon > 0 && horizon < series.len() => date,
        _ => {
            return Err(ForecastError::Horizon {
                horizon,
                series_len: series.len(),
            })
        }
    };

    let model = ArimaModel::fit(&series.values(), MODEL_ORDER)?;
    let values = model.forecast(horizon);
    if values.iter().any(|value| !value.is_finite()) {
        return Err(StatsError::degenerate("forecast diverged").into());
    }

    let points = next_business_days(last_date, horizon)
        .into_iter()
        .zip(values)
        .map(|(date, value)| ForecastPoint { date, value })
        .collect();

    Ok(Forecast {
        points,
        model: model.summary(),
    })
}
