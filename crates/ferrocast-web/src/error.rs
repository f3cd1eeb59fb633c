use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ferrocast_core::{
    Envelope, EnvelopeError, EnvelopeMeta, ForecastReport, PipelineError, ProviderId,
    ValidationError,
};
use thiserror::Error;

/// Failures surfaced by the JSON API.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("forecast horizon must be a whole number of days: '{value}'")]
    InvalidHorizon { value: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidHorizon { .. } | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Pipeline(error) => status_for(error),
        }
    }

    fn payload(&self) -> EnvelopeError {
        match self {
            Self::InvalidHorizon { .. } | Self::Validation(_) => {
                EnvelopeError::invalid_input(self.to_string())
            }
            Self::Pipeline(error) => EnvelopeError::from(error),
        }
    }

    pub fn into_envelope(self, source: ProviderId, latency_ms: u64) -> Response {
        let envelope: Envelope<ForecastReport> =
            Envelope::failure(EnvelopeMeta::new(source, latency_ms), self.payload());
        (self.status(), Json(envelope)).into_response()
    }
}

fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::NoData { .. } => StatusCode::NOT_FOUND,
        PipelineError::InsufficientData { .. } | PipelineError::FitFailure { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PipelineError::Source(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
    }
}
