use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionProvider {
    OpenAi,
    Azure,
}

/// Connection details for the configured speech-to-text provider.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionEngineOptions {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
}

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        provider: TranscriptionProvider,
        options: TranscriptionEngineOptions,
        timeout: Duration,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match provider {
            TranscriptionProvider::OpenAi => {
                let key = options.api_key.ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "API key required for OpenAI Whisper".to_string(),
                    )
                })?;
                let engine = OpenAiWhisperEngine::new(key, options.base_url, options.model, timeout)?;
                Ok(Arc::new(engine))
            }
            TranscriptionProvider::Azure => {
                let missing = |field: &str| {
                    TranscriptionError::Configuration(format!("{field} required for Azure Whisper"))
                };
                let endpoint = options.base_url.ok_or_else(|| missing("endpoint"))?;
                let deployment = options.azure_deployment.ok_or_else(|| missing("deployment"))?;
                let key = options.api_key.ok_or_else(|| missing("API key"))?;
                let api_version = options
                    .azure_api_version
                    .unwrap_or_else(|| "2024-06-01".to_string());
                let engine =
                    AzureWhisperEngine::new(&endpoint, &deployment, &key, &api_version, timeout)?;
                Ok(Arc::new(engine))
            }
        }
    }
}
