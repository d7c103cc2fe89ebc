use std::sync::Arc;

use crate::application::ports::{
    AudioConversionError, AudioNormalizer, LlmClient, TranscriptionEngine, TranscriptionError,
};
use crate::application::services::{AnalysisError, CallAnalyzer};
use crate::domain::{AnalysisReport, CallRecording, PipelineStage, PipelineState, Transcript};

/// Runs a recording through normalization, transcription and analysis, in that
/// order, stopping at the first failing stage. Nothing is retried.
pub struct CallPipeline<L>
where
    L: LlmClient,
{
    normalizer: Arc<dyn AudioNormalizer>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    analyzer: Arc<CallAnalyzer<L>>,
    language: String,
}

impl<L> CallPipeline<L>
where
    L: LlmClient,
{
    pub fn new(
        normalizer: Arc<dyn AudioNormalizer>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        analyzer: Arc<CallAnalyzer<L>>,
        language: String,
    ) -> Self {
        Self {
            normalizer,
            transcription_engine,
            analyzer,
            language,
        }
    }

    #[tracing::instrument(name = "call_pipeline", skip_all)]
    pub async fn process(
        &self,
        recording: Option<CallRecording>,
    ) -> Result<CallAnalysis, PipelineError> {
        let recording = recording.ok_or(PipelineError::MissingInput)?;

        let mut state = PipelineState::Received;
        tracing::info!(
            bytes = recording.len(),
            filename = recording.filename.as_deref().unwrap_or("unknown"),
            %state,
            "Call recording received"
        );

        state = transition(state);
        let audio = match self.normalizer.normalize(recording).await {
            Ok(audio) => audio,
            Err(e) => return Err(fail(state, PipelineError::AudioConversion(e))),
        };

        state = transition(state);
        let text = match self
            .transcription_engine
            .transcribe(&audio, &self.language)
            .await
        {
            Ok(text) => text,
            Err(e) => return Err(fail(state, PipelineError::Transcription(e))),
        };
        drop(audio);

        let transcript = Transcript::new(text, self.language.clone());
        if transcript.is_blank() {
            tracing::warn!("Transcription produced no text");
        }

        state = transition(state);
        let analysis = match self.analyzer.analyze(&transcript).await {
            Ok(report) => report,
            Err(error) => {
                return Err(fail(
                    state,
                    PipelineError::Analysis {
                        error,
                        transcript: Box::new(transcript),
                    },
                ));
            }
        };

        transition(state);
        Ok(CallAnalysis {
            transcript,
            analysis,
        })
    }
}

fn transition(from: PipelineState) -> PipelineState {
    let to = from.advance();
    tracing::debug!(from = %from, to = %to, "Pipeline transition");
    if to == PipelineState::Complete {
        tracing::info!("Call analysis completed");
    }
    to
}

fn fail(state: PipelineState, error: PipelineError) -> PipelineError {
    tracing::error!(state = %state.fail(), error = %error, "Call pipeline failed");
    error
}

#[derive(Debug, Clone)]
pub struct CallAnalysis {
    pub transcript: Transcript,
    pub analysis: AnalysisReport,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No audio file uploaded")]
    MissingInput,
    #[error("audio conversion failed: {0}")]
    AudioConversion(AudioConversionError),
    #[error("transcription failed: {0}")]
    Transcription(TranscriptionError),
    #[error("analysis failed: {error}")]
    Analysis {
        error: AnalysisError,
        transcript: Box<Transcript>,
    },
}

impl PipelineError {
    /// Stage that failed. `None` when the pipeline never started.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::MissingInput => None,
            PipelineError::AudioConversion(_) => Some(PipelineStage::Normalizing),
            PipelineError::Transcription(_) => Some(PipelineStage::Transcribing),
            PipelineError::Analysis { .. } => Some(PipelineStage::Analyzing),
        }
    }

    pub fn completed_stages(&self) -> &'static [PipelineStage] {
        self.stage().map(|stage| stage.preceding()).unwrap_or(&[])
    }

    /// Transcript obtained before a later stage failed.
    pub fn transcript(&self) -> Option<&Transcript> {
        match self {
            PipelineError::Analysis { transcript, .. } => Some(&**transcript),
            _ => None,
        }
    }
}
