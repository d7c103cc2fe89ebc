use async_trait::async_trait;

use crate::domain::CallDetailQuery;

/// Call-detail-record search on the telephony platform.
#[async_trait]
pub trait CdrGateway: Send + Sync {
    /// Returns the upstream JSON listing unchanged.
    async fn query_calls(
        &self,
        cdr_url: &str,
        access_token: &str,
        query: &CallDetailQuery,
    ) -> Result<serde_json::Value, UpstreamQueryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamQueryError {
    #[error("CDR query failed with status {status}")]
    Status { status: u16, body: String },
    #[error("CDR endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("CDR query timed out")]
    Timeout,
    #[error("CDR response is not JSON: {0}")]
    InvalidBody(String),
}

impl UpstreamQueryError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamQueryError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamQueryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamQueryError::Timeout
        } else {
            UpstreamQueryError::Unreachable(e.to_string())
        }
    }
}
