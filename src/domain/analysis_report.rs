use serde::Serialize;

/// Language-model evaluation of a call, keyed to the strengths / weaknesses /
/// recommendations template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub text: String,
}

impl AnalysisReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
