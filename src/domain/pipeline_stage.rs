use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Normalizing,
    Transcribing,
    Analyzing,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Transcribing => "transcribing",
            PipelineStage::Analyzing => "analyzing",
        }
    }

    /// Stages that completed before this one started.
    pub fn preceding(&self) -> &'static [PipelineStage] {
        match self {
            PipelineStage::Normalizing => &[],
            PipelineStage::Transcribing => &[PipelineStage::Normalizing],
            PipelineStage::Analyzing => &[PipelineStage::Normalizing, PipelineStage::Transcribing],
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Normalizing,
    Transcribing,
    Analyzing,
    Complete,
    Failed(PipelineStage),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed(_))
    }

    /// The state a successful run moves to next. Terminal states stay put.
    pub fn advance(self) -> Self {
        match self {
            PipelineState::Received => PipelineState::Normalizing,
            PipelineState::Normalizing => PipelineState::Transcribing,
            PipelineState::Transcribing => PipelineState::Analyzing,
            PipelineState::Analyzing => PipelineState::Complete,
            terminal => terminal,
        }
    }

    /// The failed state for the stage currently running, if any.
    pub fn fail(self) -> Self {
        match self.stage() {
            Some(stage) => PipelineState::Failed(stage),
            None => self,
        }
    }

    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineState::Normalizing => Some(PipelineStage::Normalizing),
            PipelineState::Transcribing => Some(PipelineStage::Transcribing),
            PipelineState::Analyzing => Some(PipelineStage::Analyzing),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Received => write!(f, "received"),
            PipelineState::Complete => write!(f, "complete"),
            PipelineState::Failed(stage) => write!(f, "failed({})", stage),
            running => match running.stage() {
                Some(stage) => write!(f, "{}", stage),
                None => Ok(()),
            },
        }
    }
}
