use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::stats::{adfuller, StatsError};

/// Significance level for rejecting the unit-root null.
const SIGNIFICANCE: f64 = 0.05;

/// ADF classification of a single series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationarityVerdict {
    pub stationary: bool,
    pub statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
    pub nobs: usize,
}

impl StationarityVerdict {
    pub const fn message(&self) -> &'static str {
        if self.stationary {
            "The series is stationary"
        } else {
            "The series is NOT stationary"
        }
    }
}

impl Display for StationarityVerdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (ADF statistic {:.4}, p-value {:.4})",
            self.message(),
            self.statistic,
            self.p_value
        )
    }
}

/// Run the ADF test and classify the series at the 5% level.
///
/// The input must already be free of missing values; NaN or infinite entries
/// are rejected rather than skipped.
pub fn test_stationarity(values: &[f64]) -> Result<StationarityVerdict, StatsError> {
    let result = adfuller(values)?;
    Ok(StationarityVerdict {
        stationary: result.p_value < SIGNIFICANCE,
        statistic: result.statistic,
        p_value: result.p_value,
        used_lag: result.used_lag,
        nobs: result.nobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::noise;

    #[test]
    fn white_noise_is_stationary() {
        let verdict = test_stationarity(&noise::gaussian(300, 7)).expect("verdict");
        assert!(verdict.stationary);
        assert_eq!(verdict.message(), "The series is stationary");
    }

    #[test]
    fn random_walk_is_not_stationary() {
        let verdict = test_stationarity(&noise::random_walk(300, 12, 100.0)).expect("verdict");
        assert!(!verdict.stationary);
        assert_eq!(verdict.message(), "The series is NOT stationary");
    }

    #[test]
    fn differencing_a_random_walk_makes_it_stationary() {
        let walk = noise::random_walk(300, 12, 100.0);
        let diffs: Vec<f64> = walk.windows(2).map(|pair| pair[1] - pair[0]).collect();

        let verdict = test_stationarity(&diffs).expect("verdict");
        assert!(verdict.stationary);
    }

    #[test]
    fn verdict_is_deterministic() {
        let series = noise::random_walk(200, 5, 20.0);
        let first = test_stationarity(&series).expect("verdict");
        let second = test_stationarity(&series).expect("verdict");
        assert_eq!(first, second);
    }

    #[test]
    fn too_short_series_reports_insufficient_data() {
        let err = test_stationarity(&[1.0, 2.0]).expect_err("short");
        assert!(matches!(err, StatsError::InsufficientData { .. }));
    }

    #[test]
    fn display_includes_statistic() {
        let verdict = StationarityVerdict {
            stationary: true,
            statistic: -3.5,
            p_value: 0.008,
            used_lag: 1,
            nobs: 100,
        };
        assert_eq!(
            verdict.to_string(),
            "The series is stationary (ADF statistic -3.5000, p-value 0.0080)"
        );
    }
}
