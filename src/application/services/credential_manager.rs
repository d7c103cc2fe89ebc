use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::ports::{
    Clock, CredentialStore, StoreError, TokenIssuer, TokenRefreshError,
};
use crate::domain::ValidToken;

/// Hands out a non-expired Yeastar access token, refreshing it when needed.
///
/// Refreshes are serialized through `refresh_lock`: callers that find the
/// token expired queue on the lock, and whoever enters after a successful
/// refresh re-reads the store and returns the fresh record without issuing a
/// second request.
pub struct CredentialManager {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
    refresh_lock: Mutex<()>,
}

impl CredentialManager {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            issuer,
            clock,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn ensure_valid_token(&self) -> Result<ValidToken, CredentialError> {
        let record = self.store.load().await?;
        let now = self.clock.now();
        if !record.is_expired_at(now) {
            return Ok(ValidToken::from(&record));
        }

        tracing::debug!(expired_at = %record.access_token_expire_time, "Access token expired");

        let _guard = self.refresh_lock.lock().await;

        let record = self.store.load().await?;
        let now = self.clock.now();
        if !record.is_expired_at(now) {
            tracing::debug!("Access token refreshed by a concurrent caller");
            return Ok(ValidToken::from(&record));
        }

        let grant = self
            .issuer
            .refresh(&record.token_url, &record.refresh_token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Access token refresh failed");
                CredentialError::TokenRefresh(e)
            })?;

        let refreshed = record.refreshed(grant, now).map_err(|e| {
            tracing::error!(error = %e, "Token endpoint returned an unusable lifetime");
            CredentialError::TokenRefresh(TokenRefreshError::InvalidResponse(e.to_string()))
        })?;
        self.store.save(&refreshed).await?;

        let current = self.store.load().await?;
        tracing::info!(
            expires_at = %current.access_token_expire_time,
            "Access token refreshed"
        );

        Ok(ValidToken::from(&current))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("token refresh failed: {0}")]
    TokenRefresh(#[from] TokenRefreshError),
}
