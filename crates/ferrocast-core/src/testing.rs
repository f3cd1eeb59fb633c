//! `DataSource` doubles shared by the unit and behaviour tests.

use std::future::Future;
use std::pin::Pin;

use crate::data_source::{DataSource, HistoryRequest, SourceError};
use crate::{PriceHistory, ProviderId};

type HistoryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>>;

/// Provider that knows no symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl DataSource for EmptySource {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(&'a self, req: HistoryRequest) -> HistoryFuture<'a> {
        Box::pin(async move { Ok(PriceHistory::empty(req.symbol)) })
    }
}

/// Provider whose every request fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingSource(pub SourceError);

impl DataSource for FailingSource {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(&'a self, _req: HistoryRequest) -> HistoryFuture<'a> {
        let error = self.0.clone();
        Box::pin(async move { Err(error) })
    }
}
