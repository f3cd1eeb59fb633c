use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineError, Stage};
use crate::{format_date, Observation, PriceHistory, Series};

/// Closing prices and the two series derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSeries {
    pub prices: Series,
    /// Percentage change, `close[t] / close[t-1] - 1`.
    pub returns: Series,
    /// First difference, `close[t] - close[t-1]`.
    pub differences: Series,
}

/// Derive the price, return and differenced series from a raw history.
///
/// The first row has no predecessor, so both derived series are one entry
/// shorter than the price series.
pub fn prepare(history: &PriceHistory) -> Result<PreparedSeries, PipelineError> {
    if history.is_empty() {
        return Err(PipelineError::NoData {
            symbol: history.symbol.clone(),
        });
    }

    let prices = Series::new(
        history
            .records
            .iter()
            .map(|record| Observation {
                date: record.date,
                value: record.close,
            })
            .collect(),
    )?;

    let mut returns = Vec::with_capacity(prices.len().saturating_sub(1));
    let mut differences = Vec::with_capacity(prices.len().saturating_sub(1));
    for pair in prices.observations().windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        let change = current.value / previous.value - 1.0;
        let difference = current.value - previous.value;
        if !change.is_finite() || !difference.is_finite() {
            return Err(PipelineError::fit_failure(
                Stage::Prepare,
                format!("non-finite change on {}", format_date(current.date)),
            ));
        }

        returns.push(Observation {
            date: current.date,
            value: change,
        });
        differences.push(Observation {
            date: current.date,
            value: difference,
        });
    }

    Ok(PreparedSeries {
        prices,
        returns: Series::new(returns)?,
        differences: Series::new(differences)?,
    })
}
