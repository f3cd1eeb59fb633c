//! Shared data sources for the behaviour tests.

use std::future::Future;
use std::pin::Pin;

use ferrocast_core::calendar::next_business_days;
use ferrocast_core::{
    DataSource, HistoryRequest, PriceHistory, PriceRecord, ProviderId, SourceError,
};
use time::Date;

pub use ferrocast_core::testing::{EmptySource, FailingSource};
pub use ferrocast_core::{pipeline, ForecastParams, SyntheticAdapter};

type HistoryFuture<'a> = Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>>;

/// Provider replaying fixed closes on consecutive business days.
pub struct FixedCloses {
    first_day: Date,
    closes: Vec<f64>,
}

impl FixedCloses {
    /// Closes start on the first business day after `anchor`.
    pub fn new(anchor: Date, closes: Vec<f64>) -> Self {
        Self {
            first_day: anchor,
            closes,
        }
    }
}

impl DataSource for FixedCloses {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(&'a self, req: HistoryRequest) -> HistoryFuture<'a> {
        Box::pin(async move {
            let dates = next_business_days(self.first_day, self.closes.len());
            let records = dates
                .into_iter()
                .zip(self.closes.iter().copied())
                .filter(|(date, _)| req.range.contains(*date))
                .map(|(date, close)| PriceRecord::new(date, close, close, close, close, Some(1_000)))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| SourceError::internal(err.to_string()))?;
            PriceHistory::new(req.symbol, records).map_err(|err| SourceError::internal(err.to_string()))
        })
    }
}
