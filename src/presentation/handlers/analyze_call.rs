use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use serde::Serialize;

use super::error::ApiError;
use crate::application::ports::LlmClient;
use crate::domain::CallRecording;
use crate::presentation::state::AppState;

pub const AUDIO_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct AnalyzeCallResponse {
    pub transcript: String,
    pub analysis: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_call_handler<L>(
    State(state): State<AppState<L>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeCallResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    let recording = match multipart {
        Ok(mut multipart) => read_recording(&mut multipart).await?,
        Err(e) => {
            tracing::warn!(error = %e, "Analyze request is not multipart");
            None
        }
    };

    let result = state.call_pipeline.process(recording).await?;

    Ok(Json(AnalyzeCallResponse {
        transcript: result.transcript.text,
        analysis: result.analysis.text,
    }))
}

async fn read_recording(multipart: &mut Multipart) -> Result<Option<CallRecording>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        tracing::debug!(
            filename = filename.as_deref().unwrap_or("unknown"),
            content_type = content_type.as_deref().unwrap_or("unknown"),
            bytes = data.len(),
            "Audio upload received"
        );

        return Ok(Some(CallRecording::new(data.to_vec(), filename, content_type)));
    }

    Ok(None)
}
