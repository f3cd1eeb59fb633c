use std::future::Future;
use std::pin::Pin;

use time::Weekday;

use crate::calendar::is_business_day;
use crate::data_source::{DataSource, HistoryRequest, SourceError};
use crate::{PriceHistory, PriceRecord, ProviderId, Symbol, ValidationError};

/// Offline source producing a deterministic random-walk history per symbol.
///
/// Every weekday in the requested range gets one record, so identical requests
/// always return identical rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticAdapter;

/// Daily volatility of the log-price walk.
const VOLATILITY: f64 = 0.012;

impl SyntheticAdapter {
    fn generate(&self, req: &HistoryRequest) -> Result<PriceHistory, SourceError> {
        let seed = symbol_seed(&req.symbol);
        let mut rng = fastrand::Rng::with_seed(seed);
        let volatility = VOLATILITY;

        let mut close = 80.0 + (seed % 4_000) as f64 / 10.0;
        let mut records = Vec::new();
        let mut day = req.range.start();
        while day < req.range.end() {
            if is_business_day(day) {
                let open = close;
                close *= (0.0002 + volatility * standard_normal(&mut rng)).exp();
                let spread = close * volatility * rng.f64();
                let high = open.max(close) + spread;
                let low = (open.min(close) - spread).max(0.0);
                let volume = 500_000 + rng.u64(0..250_000) + weekday_bias(day.weekday());

                let record = PriceRecord::new(day, open, high, low, close, Some(volume))
                    .map_err(validation_to_error)?;
                records.push(record);
            }

            let Some(next) = day.next_day() else {
                break;
            };
            day = next;
        }

        PriceHistory::new(req.symbol.clone(), records).map_err(validation_to_error)
    }
}

impl DataSource for SyntheticAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.generate(&req) })
    }
}

/// Irwin-Hall approximation of a standard normal draw.
fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    (0..12).map(|_| rng.f64()).sum::<f64>() - 6.0
}

fn weekday_bias(weekday: Weekday) -> u64 {
    match weekday {
        Weekday::Monday | Weekday::Friday => 50_000,
        _ => 0,
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}
