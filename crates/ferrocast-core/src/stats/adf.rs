use ndarray::{Array1, Array2};

use super::{ensure_finite, normal_cdf, ols, OlsFit, StatsError};

/// Smallest series the lag rule `n / 2 - 2 >= 0` accepts.
const MIN_OBSERVATIONS: usize = 4;

/// Residual energy, relative to the differenced series, treated as an exact fit.
const EXACT_FIT_TOLERANCE: f64 = 1e-20;

// MacKinnon (1994) response surface, one variable, constant only.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Outcome of an augmented Dickey-Fuller regression with a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
    pub nobs: usize,
    pub max_lag: usize,
}

/// Augmented Dickey-Fuller test, constant term, lag order chosen by AIC.
///
/// Candidate lags `0..=max_lag` are compared on the sample common to all of
/// them; the winner is refitted on every row it can use. Ties resolve to the
/// smaller lag.
pub fn adfuller(values: &[f64]) -> Result<AdfResult, StatsError> {
    ensure_finite(values)?;

    let n = values.len();
    if n < MIN_OBSERVATIONS {
        return Err(StatsError::InsufficientData {
            required: MIN_OBSERVATIONS,
            actual: n,
        });
    }

    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let max_lag = schwert.min(n / 2 - 2);

    let diffs: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();

    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let fit = regress(values, &diffs, lag, max_lag)?;
        let aic = fit.aic();
        match best {
            Some((best_aic, _)) if aic >= best_aic => {}
            _ => best = Some((aic, lag)),
        }
    }
    let used_lag = best.map(|(_, lag)| lag).unwrap_or(0);

    let fit = regress(values, &diffs, used_lag, used_lag)?;
    let energy = diffs.iter().map(|d| d * d).sum::<f64>();
    if fit.ssr <= EXACT_FIT_TOLERANCE * energy {
        return Err(StatsError::degenerate("regression fits the series exactly"));
    }

    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return Err(StatsError::degenerate("test statistic is not finite"));
    }

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag,
        nobs: fit.nobs,
        max_lag,
    })
}

/// Regress `dy[t]` on `[1, y[t], dy[t-1], .., dy[t-lag]]` for `t >= first`.
fn regress(levels: &[f64], diffs: &[f64], lag: usize, first: usize) -> Result<OlsFit, StatsError> {
    let rows = diffs.len().saturating_sub(first);
    let k = lag + 2;
    if rows <= k {
        return Err(StatsError::InsufficientData {
            required: first + k + 2,
            actual: levels.len(),
        });
    }

    let design = Array2::from_shape_fn((rows, k), |(row, col)| {
        let t = first + row;
        match col {
            0 => 1.0,
            1 => levels[t],
            j => diffs[t - (j - 1)],
        }
    });
    let response = Array1::from_shape_fn(rows, |row| diffs[first + row]);

    ols(&design, &response)
}

/// Approximate p-value for an ADF statistic (constant, one variable).
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let polynomial = if statistic <= TAU_STAR {
        evaluate(&TAU_SMALL_P, statistic)
    } else {
        evaluate(&TAU_LARGE_P, statistic)
    };
    normal_cdf(polynomial)
}

fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::noise;

    #[test]
    fn white_noise_rejects_unit_root() {
        let series = noise::gaussian(300, 7);

        let result = adfuller(&series).expect("adf");
        assert!(result.statistic < -5.0, "statistic {}", result.statistic);
        assert!(result.p_value < 0.01);
        assert_eq!(result.max_lag, 16);
    }

    #[test]
    fn random_walk_keeps_unit_root() {
        let series = noise::random_walk(300, 12, 100.0);

        let result = adfuller(&series).expect("adf");
        assert!(result.p_value > 0.05, "p-value {}", result.p_value);
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let series = noise::random_walk(120, 3, 50.0);
        assert_eq!(adfuller(&series), adfuller(&series));
    }

    #[test]
    fn short_series_is_insufficient() {
        let err = adfuller(&[1.0, 2.0, 1.5]).expect_err("too short");
        assert_eq!(
            err,
            StatsError::InsufficientData {
                required: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn constant_series_is_degenerate() {
        let err = adfuller(&[5.0; 40]).expect_err("constant");
        assert!(matches!(err, StatsError::Degenerate { .. }));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut series = noise::gaussian(50, 1);
        series[10] = f64::INFINITY;
        assert_eq!(adfuller(&series), Err(StatsError::NonFinite));
    }

    #[test]
    fn p_value_surface_is_monotonic_and_clamped() {
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-20.0), 0.0);
        // Critical value at 5% for n -> infinity is about -2.86.
        assert!((mackinnon_p_value(-2.86) - 0.05).abs() < 0.01);

        let mut previous = 0.0;
        for step in 0..100 {
            let stat = -6.0 + step as f64 * 0.08;
            let p = mackinnon_p_value(stat);
            assert!(p >= previous);
            previous = p;
        }
    }
}
