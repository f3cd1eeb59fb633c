//! Numerical building blocks for the stationarity test and the ARIMA fit.
//!
//! Everything here works on plain `&[f64]` slices and `ndarray` matrices and is
//! fully deterministic: no random starts, no iterative optimisers.

mod adf;
mod ols;

use thiserror::Error;

pub use adf::{adfuller, mackinnon_p_value, AdfResult};
pub use ols::{ols, OlsFit};

/// Errors raised by the numerical routines.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("insufficient data: {required} observations required, {actual} available")]
    InsufficientData { required: usize, actual: usize },
    #[error("series contains non-finite values")]
    NonFinite,
    #[error("degenerate input: {reason}")]
    Degenerate { reason: String },
}

impl StatsError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }
}

pub(crate) fn ensure_finite(values: &[f64]) -> Result<(), StatsError> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(StatsError::NonFinite)
    }
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Abramowitz-Stegun 7.1.26 approximation, absolute error below 1.5e-7.
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}
