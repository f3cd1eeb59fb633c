//! ARIMA(p, d, 0) estimation by conditional least squares.
//!
//! The series is differenced `d` times, an AR(p) without intercept is fitted
//! to the differenced values, and forecasts are produced recursively on the
//! differenced scale before being integrated back to levels.
//!
//! ```rust
//! use ferrocast_core::arima::{ArimaModel, ArimaOrder};
//!
//! let prices: Vec<f64> = (0..40)
//!     .map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0 + i as f64 * 0.1)
//!     .collect();
//! let model = ArimaModel::fit(&prices, ArimaOrder::new(2, 1, 0)).unwrap();
//! assert_eq!(model.forecast(5).len(), 5);
//! ```

use std::fmt::{Display, Formatter};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::stats::{ensure_finite, ols, StatsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Shortest input the conditional least squares fit accepts.
    pub const fn min_observations(&self) -> usize {
        2 * self.p + 1 + self.d
    }
}

impl Display for ArimaOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Fitted coefficients reported alongside a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArimaSummary {
    pub order: ArimaOrder,
    pub ar_coefficients: Vec<f64>,
    /// Innovation variance, `ssr / nobs`.
    pub sigma2: f64,
    pub nobs: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArimaModel {
    order: ArimaOrder,
    ar: Vec<f64>,
    sigma2: f64,
    nobs: usize,
    /// Last value at each differencing level, level 0 first.
    anchors: Vec<f64>,
    /// Most recent `p` differenced values, oldest first.
    recent: Vec<f64>,
}

impl ArimaModel {
    pub fn fit(values: &[f64], order: ArimaOrder) -> Result<Self, StatsError> {
        if order.q != 0 {
            return Err(StatsError::degenerate(
                "moving-average terms are not estimated",
            ));
        }
        ensure_finite(values)?;

        let required = order.min_observations();
        if values.len() < required {
            return Err(StatsError::InsufficientData {
                required,
                actual: values.len(),
            });
        }

        let mut anchors = Vec::with_capacity(order.d);
        let mut working = values.to_vec();
        for _ in 0..order.d {
            if let Some(last) = working.last() {
                anchors.push(*last);
            }
            working = working.windows(2).map(|pair| pair[1] - pair[0]).collect();
        }

        if working.iter().all(|value| *value == working[0]) {
            return Err(StatsError::degenerate(
                "differenced series is constant",
            ));
        }

        let p = order.p;
        let (ar, ssr, nobs) = if p == 0 {
            let ssr = working.iter().map(|w| w * w).sum::<f64>();
            (Vec::new(), ssr, working.len())
        } else {
            let rows = working.len() - p;
            let design = Array2::from_shape_fn((rows, p), |(row, lag)| working[row + p - 1 - lag]);
            let response = Array1::from_shape_fn(rows, |row| working[row + p]);
            let fit = ols(&design, &response)?;
            (fit.params.to_vec(), fit.ssr, fit.nobs)
        };

        let recent = working[working.len() - p..].to_vec();

        Ok(Self {
            order,
            ar,
            sigma2: ssr / nobs as f64,
            nobs,
            anchors,
            recent,
        })
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub const fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn summary(&self) -> ArimaSummary {
        ArimaSummary {
            order: self.order,
            ar_coefficients: self.ar.clone(),
            sigma2: self.sigma2,
            nobs: self.nobs,
        }
    }

    /// Point forecasts for the next `steps` periods on the original scale.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let p = self.order.p;
        let mut history = self.recent.clone();
        let mut differenced = Vec::with_capacity(steps);
        for _ in 0..steps {
            let len = history.len();
            let next = (0..p)
                .map(|lag| self.ar[lag] * history[len - 1 - lag])
                .sum::<f64>();
            history.push(next);
            differenced.push(next);
        }

        let mut levels = differenced;
        for anchor in self.anchors.iter().rev() {
            let mut running = *anchor;
            for value in &mut levels {
                running += *value;
                *value = running;
            }
        }
        levels
    }
}
