use serde::{Deserialize, Serialize};
use time::Date;

use crate::ValidationError;

/// A dated value in a derived series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: Date,
    pub value: f64,
}

/// Ordered, date-unique numeric series (closing prices, returns, differences).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series; dates must be strictly increasing.
    pub fn new(observations: Vec<Observation>) -> Result<Self, ValidationError> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::UnorderedDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.value).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<Date> {
        self.observations.first().map(|obs| obs.date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.observations.last().map(|obs| obs.date)
    }

    pub fn has_non_finite(&self) -> bool {
        self.observations.iter().any(|obs| !obs.value.is_finite())
    }
}
