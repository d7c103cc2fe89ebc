use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CdrGateway, TokenIssuer, TokenRefreshError, UpstreamQueryError};
use crate::domain::{CallDetailQuery, TokenGrant};
use crate::infrastructure::observability::sanitize_for_log;

/// Yeastar rejects OpenAPI calls without this user agent.
const YEASTAR_USER_AGENT: &str = "OpenAPI";
const CDR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Yeastar access tokens live 30 minutes; lifetimes over a week are rejected.
const MAX_TOKEN_LIFETIME_SECS: u64 = 7 * 24 * 60 * 60;

/// HTTP client for the Yeastar PBX OpenAPI: token refresh and CDR search.
pub struct YeastarClient {
    client: reqwest::Client,
}

impl YeastarClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(YEASTAR_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    errcode: Option<i64>,
    #[serde(default)]
    errmsg: Option<String>,
    access_token: Option<String>,
    /// Lifetime of the new access token, in seconds.
    access_token_expire_time: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
struct CdrSearchRequest {
    start_time: String,
    end_time: String,
    direction: &'static str,
    limit: u32,
    offset: u32,
}

impl From<&CallDetailQuery> for CdrSearchRequest {
    fn from(query: &CallDetailQuery) -> Self {
        Self {
            start_time: query.start_time().format(CDR_TIME_FORMAT).to_string(),
            end_time: query.end_time().format(CDR_TIME_FORMAT).to_string(),
            direction: query.direction().as_str(),
            limit: query.limit(),
            offset: query.offset(),
        }
    }
}

#[async_trait]
impl TokenIssuer for YeastarClient {
    async fn refresh(
        &self,
        token_url: &str,
        refresh_token: &str,
    ) -> Result<TokenGrant, TokenRefreshError> {
        tracing::debug!(token_url, "Refreshing Yeastar access token");

        let response = self
            .client
            .post(token_url)
            .json(&RefreshRequest {
                grant_type: "refresh_token",
                refresh_token,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenRefreshError::Rejected {
                status: status.as_u16(),
                message: sanitize_for_log(&body),
            });
        }

        let parsed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| TokenRefreshError::InvalidResponse(e.to_string()))?;

        if let Some(code) = parsed.errcode.filter(|code| *code != 0) {
            return Err(TokenRefreshError::Rejected {
                status: status.as_u16(),
                message: format!(
                    "errcode {}: {}",
                    code,
                    parsed.errmsg.as_deref().unwrap_or("unknown error")
                ),
            });
        }

        let access_token = parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| TokenRefreshError::InvalidResponse("missing access_token".to_string()))?;
        let expires_in = parsed
            .access_token_expire_time
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                TokenRefreshError::InvalidResponse("missing access_token_expire_time".to_string())
            })?;
        if expires_in > MAX_TOKEN_LIFETIME_SECS {
            return Err(TokenRefreshError::InvalidResponse(format!(
                "access_token_expire_time of {}s exceeds {}s",
                expires_in, MAX_TOKEN_LIFETIME_SECS
            )));
        }

        Ok(TokenGrant {
            access_token,
            expires_in: Duration::from_secs(expires_in),
            refresh_token: parsed.refresh_token,
        })
    }
}

#[async_trait]
impl CdrGateway for YeastarClient {
    async fn query_calls(
        &self,
        cdr_url: &str,
        access_token: &str,
        query: &CallDetailQuery,
    ) -> Result<serde_json::Value, UpstreamQueryError> {
        let response = self
            .client
            .post(cdr_url)
            .bearer_auth(access_token)
            .json(&CdrSearchRequest::from(query))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %sanitize_for_log(&body),
                "CDR endpoint returned an error"
            );
            return Err(UpstreamQueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let listing = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| UpstreamQueryError::InvalidBody(e.to_string()))?;

        Ok(listing)
    }
}
