use thiserror::Error;
use time::Date;

/// Validation and contract errors exposed by `ferrocast-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptySymbol,
    #[error("ticker is {len} characters long, at most {max} allowed")]
    SymbolTooLong { len: usize, max: usize },
    #[error("ticker contains '{ch}' at position {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("start date {start} must precede end date {end}")]
    EmptyDateRange { start: Date, end: Date },
    #[error("invalid source '{value}', expected one of yahoo, synthetic")]
    InvalidSource { value: String },
    #[error("forecast horizon {value} is outside {min}..={max}")]
    HorizonOutOfRange { value: usize, min: usize, max: usize },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("close price must be strictly positive")]
    NonPositiveClose,
    #[error("price high must be >= low")]
    InvalidPriceRange,
    #[error("series dates must be strictly increasing: {next} follows {previous}")]
    UnorderedDates { previous: Date, next: Date },

    #[error("setting '{key}' has invalid value '{value}'")]
    InvalidSetting { key: &'static str, value: String },
}
