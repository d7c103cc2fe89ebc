mod call_analyzer;
mod call_pipeline;
mod cdr_query_service;
mod credential_manager;

pub use call_analyzer::{
    AnalysisError, AnalysisTemplate, CallAnalyzer, DEFAULT_ANALYSIS_PROMPT,
    DEFAULT_ANALYSIS_TEMPERATURE, TRANSCRIPT_PLACEHOLDER,
};
pub use call_pipeline::{CallAnalysis, CallPipeline, PipelineError};
pub use cdr_query_service::{CdrQueryError, CdrQueryService};
pub use credential_manager::{CredentialError, CredentialManager};
