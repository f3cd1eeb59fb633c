use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pipeline::PipelineError;
use crate::ProviderId;

/// Machine-readable wrapper for JSON output from the CLI and the web API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failure(meta: EnvelopeMeta, error: EnvelopeError) -> Self {
        Self {
            meta,
            data: None,
            errors: vec![error],
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub source: ProviderId,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    /// Metadata with a fresh v4 request id.
    pub fn new(source: ProviderId, latency_ms: u64) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            generated_at: now_rfc3339(),
            source,
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl EnvelopeError {
    /// Error for input rejected before the pipeline ran.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: String::from("invalid_input"),
            message: message.into(),
            retryable: None,
        }
    }
}

impl From<&PipelineError> for EnvelopeError {
    fn from(error: &PipelineError) -> Self {
        let retryable = match error {
            PipelineError::Source(source) => Some(source.retryable()),
            _ => None,
        };
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            retryable,
        }
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceError;
    use crate::Symbol;

    #[test]
    fn meta_has_uuid_and_timestamp() {
        let meta = EnvelopeMeta::new(ProviderId::Yahoo, 42);

        assert!(Uuid::parse_str(&meta.request_id).is_ok());
        assert!(OffsetDateTime::parse(&meta.generated_at, &Rfc3339).is_ok());
        assert_eq!(meta.latency_ms, 42);
    }

    #[test]
    fn invalid_input_is_not_retryable() {
        let error = EnvelopeError::invalid_input("forecast horizon 61 is outside 5..=60");
        assert_eq!(error.code, "invalid_input");
        assert_eq!(error.retryable, None);
    }

    #[test]
    fn failure_envelope_carries_pipeline_code() {
        let error = PipelineError::NoData {
            symbol: Symbol::parse("ZZZZ").expect("symbol"),
        };
        let envelope: Envelope<()> =
            Envelope::failure(EnvelopeMeta::new(ProviderId::Yahoo, 3), (&error).into());

        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["errors"][0]["code"], "no_data");
        assert_eq!(
            json["errors"][0]["message"],
            "No data found! Please check ticker name."
        );
        assert!(!envelope.is_success());
    }

    #[test]
    fn source_errors_are_marked_retryable() {
        let error = PipelineError::Source(SourceError::unavailable("timeout"));
        let payload = EnvelopeError::from(&error);
        assert_eq!(payload.code, "source_unavailable");
        assert_eq!(payload.retryable, Some(true));
    }
}
