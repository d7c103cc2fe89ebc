use std::sync::Arc;

use crate::application::ports::LlmClient;
use crate::application::services::{CallPipeline, CdrQueryService};

/// Fallbacks for CDR listing parameters the client leaves out.
#[derive(Debug, Clone, Copy)]
pub struct CdrDefaults {
    pub window: chrono::Duration,
    pub limit: u32,
}

impl CdrDefaults {
    pub fn new(window_hours: u32, limit: u32) -> Self {
        Self {
            window: chrono::Duration::hours(i64::from(window_hours)),
            limit,
        }
    }
}

pub struct AppState<L>
where
    L: LlmClient,
{
    pub call_pipeline: Arc<CallPipeline<L>>,
    pub cdr_query_service: Arc<CdrQueryService>,
    pub cdr_defaults: CdrDefaults,
    pub max_upload_bytes: usize,
}

impl<L> Clone for AppState<L>
where
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            call_pipeline: Arc::clone(&self.call_pipeline),
            cdr_query_service: Arc::clone(&self.cdr_query_service),
            cdr_defaults: self.cdr_defaults,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
