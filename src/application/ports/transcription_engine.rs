use async_trait::async_trait;

use crate::domain::NormalizedAudio;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// Returns the plain-text transcript. `language` is an ISO-639-1 hint.
    async fn transcribe(
        &self,
        audio: &NormalizedAudio,
        language: &str,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("transcription request timed out")]
    Timeout,
    #[error("engine configuration invalid: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscriptionError::Timeout
        } else {
            TranscriptionError::ApiRequestFailed(format!("request: {}", e))
        }
    }
}
