//! # Domain Models
//!
//! Canonical domain types for ferrocast price histories.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`PriceRecord`] | One trading day of OHLCV data |
//! | [`PriceHistory`] | Raw fetch result for one symbol |
//! | [`Series`] | Dated numeric series derived from a history |
//! | [`DateRange`] | Half-open request range |
//!
//! All types validate their invariants at construction time:
//!
//! ```rust
//! use ferrocast_core::{DateRange, ValidationError};
//!
//! let err = DateRange::parse("2025-11-01", "2024-01-01").unwrap_err();
//! assert!(matches!(err, ValidationError::EmptyDateRange { .. }));
//! ```

mod dates;
mod models;
mod series;
mod symbol;

pub use dates::{format_date, parse_date, DateRange};
pub use models::{PriceHistory, PriceRecord};
pub use series::{Observation, Series};
pub use symbol::Symbol;
