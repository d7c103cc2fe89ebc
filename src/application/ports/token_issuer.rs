use async_trait::async_trait;

use crate::domain::TokenGrant;

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn refresh(
        &self,
        token_url: &str,
        refresh_token: &str,
    ) -> Result<TokenGrant, TokenRefreshError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenRefreshError {
    #[error("token endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("token endpoint timed out")]
    Timeout,
    #[error("token endpoint rejected refresh with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TokenRefreshError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TokenRefreshError::Timeout
        } else {
            TokenRefreshError::Unreachable(e.to_string())
        }
    }
}
