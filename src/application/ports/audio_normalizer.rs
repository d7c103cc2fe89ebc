use async_trait::async_trait;

use crate::domain::{CallRecording, NormalizedAudio};

/// Converts an uploaded recording into 16 kHz mono WAV.
#[async_trait]
pub trait AudioNormalizer: Send + Sync {
    async fn normalize(&self, recording: CallRecording)
    -> Result<NormalizedAudio, AudioConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioConversionError {
    #[error("audio input is empty")]
    EmptyInput,
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("audio encoding failed: {0}")]
    EncodingFailed(String),
    #[error("transcoder unavailable: {0}")]
    TranscoderUnavailable(String),
    #[error("transcoding timed out after {0}s")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
