use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{AudioConversionError, UpstreamQueryError};
use crate::application::services::{CdrQueryError, CredentialError, PipelineError};
use crate::domain::PipelineStage;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_stages: Option<&'static [PipelineStage]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            stage: None,
            completed_stages: None,
            transcript: None,
        }
    }
}

/// Boundary translation of service failures into HTTP responses.
///
/// Response bodies carry fixed messages; adapter detail such as file paths
/// and subprocess output stays in the logs.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Pipeline(PipelineError),
    UpstreamStatus { status: u16 },
    Internal(&'static str),
}

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        ApiError::Pipeline(error)
    }
}

impl From<CdrQueryError> for ApiError {
    fn from(error: CdrQueryError) -> Self {
        match error {
            CdrQueryError::InvalidRange(e) => ApiError::BadRequest(e.to_string()),
            CdrQueryError::Upstream(UpstreamQueryError::Status { status, .. }) => {
                ApiError::UpstreamStatus { status }
            }
            CdrQueryError::Credential(e) => {
                tracing::error!(error = %e, "No usable Yeastar credential for CDR query");
                ApiError::Internal(match e {
                    CredentialError::Store(_) => "Yeastar credentials are unavailable",
                    CredentialError::TokenRefresh(_) => "Failed to refresh Yeastar access token",
                })
            }
            CdrQueryError::Upstream(_) => ApiError::Internal("Failed to fetch calls from Yeastar"),
        }
    }
}

fn pipeline_message(error: &PipelineError) -> String {
    match error {
        PipelineError::MissingInput => error.to_string(),
        PipelineError::AudioConversion(e) => match e {
            AudioConversionError::EmptyInput => "Uploaded audio file is empty".to_string(),
            AudioConversionError::DecodingFailed(_) => "Audio could not be decoded".to_string(),
            AudioConversionError::EncodingFailed(_) | AudioConversionError::Io(_) => {
                "Audio conversion failed".to_string()
            }
            AudioConversionError::TranscoderUnavailable(_) => {
                "Audio transcoder is unavailable".to_string()
            }
            AudioConversionError::Timeout(secs) => {
                format!("Audio conversion timed out after {}s", secs)
            }
        },
        PipelineError::Transcription(_) => "Transcription failed".to_string(),
        PipelineError::Analysis { .. } => "Call analysis failed".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            ApiError::Pipeline(PipelineError::MissingInput) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(pipeline_message(&PipelineError::MissingInput)),
            ),
            ApiError::Pipeline(error) => {
                let body = ErrorResponse {
                    error: pipeline_message(&error),
                    status: None,
                    stage: error.stage(),
                    completed_stages: Some(error.completed_stages()),
                    transcript: error.transcript().map(|t| t.text.clone()),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            ApiError::UpstreamStatus { status } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: Some(status),
                    ..ErrorResponse::new("Failed to fetch calls from Yeastar")
                },
            ),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(message))
            }
        };

        (status, Json(body)).into_response()
    }
}
