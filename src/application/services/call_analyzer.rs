use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{AnalysisReport, Transcript};

pub const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

/// Thai insurance-sales evaluation: strengths, weaknesses, recommendations.
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"บทสนทนาเกี่ยวกับการขายประกันรถยนต์:

"""{transcript}"""

วิเคราะห์บทสนทนา:
1. จุดแข็งของพนักงานขาย
2. จุดอ่อน
3. คำแนะนำที่ควรปรับปรุง

ตอบเป็นภาษาไทยและเป็นข้อ ๆ"#;

pub const DEFAULT_ANALYSIS_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct AnalysisTemplate {
    pub prompt: String,
    pub temperature: f32,
}

impl AnalysisTemplate {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
        }
    }

    pub fn render(&self, transcript: &Transcript) -> String {
        if self.prompt.contains(TRANSCRIPT_PLACEHOLDER) {
            self.prompt.replace(TRANSCRIPT_PLACEHOLDER, &transcript.text)
        } else {
            format!("{}\n\n\"\"\"{}\"\"\"", self.prompt, transcript.text)
        }
    }
}

impl Default for AnalysisTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_PROMPT, DEFAULT_ANALYSIS_TEMPERATURE)
    }
}

pub struct CallAnalyzer<L>
where
    L: LlmClient,
{
    llm_client: Arc<L>,
    template: AnalysisTemplate,
}

impl<L> CallAnalyzer<L>
where
    L: LlmClient,
{
    pub fn new(llm_client: Arc<L>, template: AnalysisTemplate) -> Self {
        Self {
            llm_client,
            template,
        }
    }

    pub async fn analyze(&self, transcript: &Transcript) -> Result<AnalysisReport, AnalysisError> {
        let prompt = self.template.render(transcript);

        tracing::debug!(
            transcript_chars = transcript.text.chars().count(),
            temperature = self.template.temperature,
            "Requesting call analysis"
        );

        let completion = self
            .llm_client
            .complete(&prompt, self.template.temperature)
            .await
            .map_err(AnalysisError::Completion)?;

        let completion = completion.trim();
        if completion.is_empty() {
            return Err(AnalysisError::EmptyCompletion);
        }

        Ok(AnalysisReport::new(completion))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("completion: {0}")]
    Completion(LlmClientError),
    #[error("language model returned an empty completion")]
    EmptyCompletion,
}
