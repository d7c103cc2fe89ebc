use async_trait::async_trait;

use crate::domain::CredentialRecord;

/// Durable home of the single credential record.
///
/// `save` replaces the whole record; a concurrent `load` observes either the
/// previous record or the new one, never a mix of both.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<CredentialRecord, StoreError>;

    async fn save(&self, record: &CredentialRecord) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
    #[error("credential write failed: {0}")]
    WriteFailed(String),
}
