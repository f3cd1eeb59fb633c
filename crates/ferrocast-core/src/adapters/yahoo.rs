use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::{Date, Duration, OffsetDateTime, Time};
use tracing::{debug, info};

use crate::data_source::{DataSource, HistoryRequest, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{PriceHistory, PriceRecord, ProviderId, Settings, ValidationError};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance adapter backed by the v8 chart endpoint.
///
/// One request per call; no cookie/crumb handshake is needed for daily charts.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    adjust_prices: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 10_000,
            adjust_prices: true,
        }
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::default()
            .with_base_url(settings.yahoo_base_url.clone())
            .with_timeout_ms(settings.http_timeout_ms)
            .with_adjusted_prices(settings.adjust_prices)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Scale OHLC by `adjclose / close` (split and dividend adjusted prices).
    pub fn with_adjusted_prices(mut self, adjust_prices: bool) -> Self {
        self.adjust_prices = adjust_prices;
        self
    }

    fn chart_request(&self, req: &HistoryRequest) -> HttpRequest {
        // Widen by a day each side; rows are filtered on exchange-local dates.
        let period1 = unix_midnight(req.range.start()) - Duration::DAY.whole_seconds();
        let period2 = unix_midnight(req.range.end()) + Duration::DAY.whole_seconds();
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(req.symbol.as_str())
        );
        HttpRequest::get(url)
            .query("period1", period1)
            .query("period2", period2)
            .query("interval", "1d")
            .query("events", "div,split")
            .query("includeAdjustedClose", true)
            .header("referer", "https://finance.yahoo.com/")
            .timeout_ms(self.timeout_ms)
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<PriceHistory, SourceError> {
        let request = self.chart_request(req);
        debug!(url = %request.full_url(), "requesting yahoo chart");

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {error}"))
            } else {
                SourceError::internal(format!("yahoo transport error: {error}"))
            }
        })?;

        match response.status {
            404 => {
                info!(symbol = %req.symbol, "yahoo has no chart for symbol");
                return Ok(PriceHistory::empty(req.symbol.clone()));
            }
            429 => {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited the chart request",
                ))
            }
            status if !response.is_success() => {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )))
            }
            _ => {}
        }

        self.parse_chart_response(req, &response.body)
    }

    fn parse_chart_response(
        &self,
        req: &HistoryRequest,
        body: &str,
    ) -> Result<PriceHistory, SourceError> {
        let chart_response: YahooChartResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

        if let Some(error) = chart_response.chart.error {
            if error.code.eq_ignore_ascii_case("not found") {
                return Ok(PriceHistory::empty(req.symbol.clone()));
            }
            return Err(SourceError::unavailable(format!(
                "yahoo chart API error: {} ({})",
                error.description.unwrap_or_default(),
                error.code
            )));
        }

        let Some(result) = chart_response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
        else {
            return Ok(PriceHistory::empty(req.symbol.clone()));
        };

        let Some(timestamps) = result.timestamp else {
            return Ok(PriceHistory::empty(req.symbol.clone()));
        };

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let adjclose = result
            .indicators
            .adjclose
            .and_then(|columns| columns.into_iter().next())
            .map(|column| column.adjclose)
            .unwrap_or_default();
        let gmtoffset = result.meta.map(|meta| meta.gmtoffset).unwrap_or(0);

        let mut records = Vec::with_capacity(timestamps.len());
        let mut skipped = 0_usize;
        for (i, &ts_value) in timestamps.iter().enumerate() {
            let date = local_date(ts_value, gmtoffset)?;
            if !req.range.contains(date) {
                continue;
            }

            let (Some(open), Some(high), Some(low), Some(close)) = (
                column_value(&quote.open, i),
                column_value(&quote.high, i),
                column_value(&quote.low, i),
                column_value(&quote.close, i),
            ) else {
                skipped += 1;
                continue;
            };

            let ratio = match column_value(&adjclose, i) {
                Some(adjusted) if self.adjust_prices && close > 0.0 => adjusted / close,
                _ => 1.0,
            };
            let volume = quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .and_then(|v| u64::try_from(v).ok());

            let Ok(record) = PriceRecord::new(
                date,
                open * ratio,
                high * ratio,
                low * ratio,
                close * ratio,
                volume,
            ) else {
                skipped += 1;
                continue;
            };

            // Yahoo occasionally repeats the live session row; keep the latest.
            if records.last().is_some_and(|last: &PriceRecord| last.date == date) {
                records.pop();
            }
            records.push(record);
        }

        if skipped > 0 {
            debug!(symbol = %req.symbol, skipped, "dropped incomplete or invalid yahoo rows");
        }

        PriceHistory::new(req.symbol.clone(), records).map_err(validation_to_error)
    }
}

impl DataSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_history(&req).await })
    }
}

// ============================================================================
// Yahoo chart response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn column_value(column: &[Option<f64>], index: usize) -> Option<f64> {
    column
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

fn unix_midnight(date: Date) -> i64 {
    date.with_time(Time::MIDNIGHT).assume_utc().unix_timestamp()
}

fn local_date(ts_value: i64, gmtoffset: i64) -> Result<Date, SourceError> {
    let local = ts_value.checked_add(gmtoffset).ok_or_else(|| {
        SourceError::internal(format!(
            "timestamp {ts_value} overflows with offset {gmtoffset}"
        ))
    })?;
    OffsetDateTime::from_unix_timestamp(local)
        .map(|ts| ts.date())
        .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use time::macros::date;

    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::{DateRange, Symbol};

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn respond(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse::new(status, body)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failure() -> Self {
            Self {
                response: Err(HttpError::Timeout(String::from("upstream timeout"))),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    // Three Tokyo sessions (00:00 UTC = 09:00 JST) plus a row with a null close.
    const TOKYO_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "currency": "JPY", "symbol": "7203.T", "gmtoffset": 32400 },
                "timestamp": [1704326400, 1704412800, 1704672000, 1704758400],
                "indicators": {
                    "quote": [{
                        "open":   [2500.0, 2550.0, 2600.0, 2620.0],
                        "high":   [2560.0, 2580.0, 2650.0, 2640.0],
                        "low":    [2490.0, 2530.0, 2590.0, 2600.0],
                        "close":  [2550.0, 2570.0, null,   2630.0],
                        "volume": [1000, 2000, 3000, 4000]
                    }],
                    "adjclose": [{ "adjclose": [2500.0, 2570.0, null, 2630.0] }]
                }
            }],
            "error": null
        }
    }"#;

    fn request(start: &str, end: &str) -> HistoryRequest {
        HistoryRequest::new(
            Symbol::parse("7203.T").expect("valid symbol"),
            DateRange::parse(start, end).expect("valid range"),
        )
    }

    #[tokio::test]
    async fn parses_chart_into_local_dates_and_adjusts_prices() {
        let client = Arc::new(RecordingHttpClient::respond(200, TOKYO_CHART));
        let adapter = YahooAdapter::with_http_client(client.clone());

        let history = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect("history should parse");

        let dates = history.records.iter().map(|r| r.date).collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![date!(2024 - 01 - 04), date!(2024 - 01 - 05), date!(2024 - 01 - 09)]
        );

        let first = &history.records[0];
        let ratio = 2500.0 / 2550.0;
        assert!((first.close - 2500.0).abs() < 1e-9);
        assert!((first.open - 2500.0 * ratio).abs() < 1e-9);
        assert_eq!(first.volume, Some(1000));

        let url = client.recorded_requests()[0].full_url();
        assert!(url.contains("/v8/finance/chart/7203.T?"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("events=div%2Csplit"));
    }

    #[tokio::test]
    async fn unadjusted_mode_keeps_raw_close() {
        let client = Arc::new(RecordingHttpClient::respond(200, TOKYO_CHART));
        let adapter = YahooAdapter::with_http_client(client).with_adjusted_prices(false);

        let history = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect("history should parse");
        assert!((history.records[0].close - 2550.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn end_date_is_exclusive() {
        let client = Arc::new(RecordingHttpClient::respond(200, TOKYO_CHART));
        let adapter = YahooAdapter::with_http_client(client);

        let history = adapter
            .daily_history(request("2024-01-04", "2024-01-05"))
            .await
            .expect("history should parse");
        assert_eq!(history.len(), 1);
        assert_eq!(history.records[0].date, date!(2024 - 01 - 04));
    }

    #[tokio::test]
    async fn not_found_symbol_is_empty_history() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let adapter =
            YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::respond(404, body)));

        let history = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect("not found is not an error");
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn result_without_timestamps_is_empty_history() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let adapter =
            YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::respond(200, body)));

        let history = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect("empty range is not an error");
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_recoverable_error() {
        let adapter = YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::failure()));

        let error = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect_err("transport failure must surface");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.retryable());
    }

    #[tokio::test]
    async fn rate_limit_and_server_errors_are_classified() {
        let adapter =
            YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::respond(429, "")));
        let error = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);

        let adapter =
            YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::respond(503, "")));
        let error = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect_err("must fail");
        assert!(error.message().contains("503"));
    }

    #[tokio::test]
    async fn malformed_body_is_internal_error() {
        let adapter =
            YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::respond(200, "<html>")));
        let error = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Internal);
    }

    #[tokio::test]
    async fn overflowing_timestamp_is_internal_error() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":32400},"timestamp":[9223372036854775800],"indicators":{"quote":[{"open":[1.0],"high":[1.0],"low":[1.0],"close":[1.0]}]}}],"error":null}}"#;
        let adapter =
            YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::respond(200, body)));

        let error = adapter
            .daily_history(request("2024-01-01", "2024-02-01"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Internal);
        assert!(error.message().contains("overflows"));
    }
}
