use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::application::ports::{CdrGateway, UpstreamQueryError};
use crate::application::services::{CredentialError, CredentialManager};
use crate::domain::{CallDetailQuery, CallDirection, InvalidRangeError};

pub struct CdrQueryService {
    credentials: Arc<CredentialManager>,
    gateway: Arc<dyn CdrGateway>,
}

impl CdrQueryService {
    pub fn new(credentials: Arc<CredentialManager>, gateway: Arc<dyn CdrGateway>) -> Self {
        Self {
            credentials,
            gateway,
        }
    }

    /// Lists calls between `start_time` and `end_time`. The range is checked
    /// before any credential or network work happens.
    pub async fn list_calls(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        direction: CallDirection,
        limit: u32,
        offset: u32,
    ) -> Result<serde_json::Value, CdrQueryError> {
        let query = CallDetailQuery::new(start_time, end_time, direction, limit, offset)?;
        self.query(&query).await
    }

    pub async fn query(&self, query: &CallDetailQuery) -> Result<serde_json::Value, CdrQueryError> {
        let token = self.credentials.ensure_valid_token().await?;

        tracing::debug!(
            start = %query.start_time(),
            end = %query.end_time(),
            direction = %query.direction(),
            limit = query.limit(),
            offset = query.offset(),
            "Querying call detail records"
        );

        let listing = self
            .gateway
            .query_calls(&token.cdr_url, &token.access_token, query)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "CDR query failed");
                CdrQueryError::Upstream(e)
            })?;

        Ok(listing)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CdrQueryError {
    #[error("invalid query: {0}")]
    InvalidRange(#[from] InvalidRangeError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Upstream(#[from] UpstreamQueryError),
}
