//! Data source trait and request types.
//!
//! This module defines the adapter contract (`DataSource`) that provider
//! implementations follow. There is a single endpoint: daily OHLCV history for
//! one symbol over a half-open date range.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferrocast_core::{DataSource, DateRange, HistoryRequest, Symbol, YahooAdapter};
//!
//! async fn fetch(adapter: &YahooAdapter) -> Result<(), Box<dyn std::error::Error>> {
//!     let request = HistoryRequest::new(
//!         Symbol::parse("7203.T")?,
//!         DateRange::parse("2024-01-01", "2025-11-01")?,
//!     );
//!     let history = adapter.daily_history(request).await?;
//!     println!("{} rows", history.len());
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::{DateRange, PriceHistory, ProviderId, Symbol};

/// Why a provider could not deliver a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Unreachable or failing with a server error.
    Unavailable,
    /// The provider asked us to slow down.
    RateLimited,
    /// The provider answered but the body made no sense.
    Internal,
}

impl SourceErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unavailable => "source.unavailable",
            Self::RateLimited => "source.rate_limited",
            Self::Internal => "source.internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({})", .kind.code())]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Transport trouble and throttling may clear up; malformed data will not.
    pub const fn retryable(&self) -> bool {
        !matches!(self.kind, SourceErrorKind::Internal)
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Request payload for the daily history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: DateRange,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: DateRange) -> Self {
        Self { symbol, range }
    }
}

/// Source adapter contract.
///
/// An empty [`PriceHistory`] means the provider has no rows for the symbol and
/// range; it is not an error. Transport and provider failures are reported as
/// [`SourceError`].
pub trait DataSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches daily OHLCV rows for `req.symbol` within `req.range`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider is unreachable, answers with a
    /// failure status, or returns a body that cannot be parsed.
    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_follow_kind() {
        assert_eq!(SourceError::unavailable("down").code(), "source.unavailable");
        assert_eq!(
            SourceError::rate_limited("slow down").kind(),
            SourceErrorKind::RateLimited
        );
        assert!(!SourceError::internal("parse").retryable());
        assert!(SourceError::rate_limited("slow down").retryable());
    }

    #[test]
    fn display_includes_code() {
        let error = SourceError::unavailable("yahoo returned status 503");
        assert_eq!(
            error.to_string(),
            "yahoo returned status 503 (source.unavailable)"
        );
    }
}
