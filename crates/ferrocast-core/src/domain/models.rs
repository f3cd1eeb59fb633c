use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Symbol, ValidationError};

/// One trading day of OHLCV data as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceRecord {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if close <= 0.0 {
            return Err(ValidationError::NonPositiveClose);
        }

        if high < low {
            return Err(ValidationError::InvalidPriceRange);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Raw daily history for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub records: Vec<PriceRecord>,
}

impl PriceHistory {
    /// Build a history, sorting records by date and rejecting duplicate dates.
    pub fn new(symbol: Symbol, mut records: Vec<PriceRecord>) -> Result<Self, ValidationError> {
        records.sort_by_key(|record| record.date);
        for pair in records.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(ValidationError::UnorderedDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }

        Ok(Self { symbol, records })
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The earliest `rows` records.
    pub fn head(&self, rows: usize) -> &[PriceRecord] {
        &self.records[..rows.min(self.records.len())]
    }

    pub fn last_date(&self) -> Option<Date> {
        self.records.last().map(|record| record.date)
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
