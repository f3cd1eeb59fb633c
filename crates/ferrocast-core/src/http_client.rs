//! GET-only transport the provider adapters send requests through.
//!
//! Adapters build an [`HttpRequest`] and hand it to an [`HttpClient`]; tests
//! substitute a recording client so no socket is ever opened.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_owned(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn timeout_ms(mut self, millis: u64) -> Self {
        self.timeout = Duration::from_millis(millis);
        self
    }

    /// The URL with its percent-encoded query string, as sent on the wire.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let pairs = self
            .query
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>();
        format!("{}?{}", self.url, pairs.join("&"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// Failure before a complete response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request could not be built: {0}")]
    InvalidRequest(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl HttpError {
    /// Whether sending the same request again could succeed.
    pub const fn retryable(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_))
    }
}

pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// [`HttpClient`] over a shared `reqwest` connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ferrocast/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

fn classify(error: reqwest::Error) -> HttpError {
    let detail = error.to_string();
    if error.is_timeout() {
        HttpError::Timeout(detail)
    } else if error.is_connect() {
        HttpError::Connect(detail)
    } else if error.is_builder() {
        HttpError::InvalidRequest(detail)
    } else {
        HttpError::Transport(detail)
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let builder = request.headers.iter().fold(
                self.client
                    .get(&request.url)
                    .query(&request.query)
                    .timeout(request.timeout),
                |builder, (name, value)| builder.header(name.as_str(), value.as_str()),
            );

            let response = builder.send().await.map_err(classify)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(classify)?;
            Ok(HttpResponse::new(status, body))
        })
    }
}
