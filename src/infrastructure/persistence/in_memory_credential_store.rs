use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{CredentialStore, StoreError};
use crate::domain::CredentialRecord;

/// Process-local store; the record does not survive a restart.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    record: RwLock<Option<CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new(record: CredentialRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<CredentialRecord, StoreError> {
        self.record
            .read()
            .await
            .clone()
            .ok_or_else(|| StoreError::Unavailable("no credential record provisioned".to_string()))
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        *self.record.write().await = Some(record.clone());
        Ok(())
    }
}
