use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::application::ports::{CredentialStore, StoreError};
use crate::domain::CredentialRecord;

/// Credential record kept in a JSON file.
///
/// Writes go to a sibling temporary file which is synced and then renamed over
/// the target, so a reader sees either the previous or the new record in full.
pub struct JsonFileCredentialStore {
    path: PathBuf,
}

impl JsonFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for JsonFileCredentialStore {
    async fn load(&self) -> Result<CredentialRecord, StoreError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => "file not found".to_string(),
                _ => e.to_string(),
            };
            StoreError::Unavailable(format!("{}: {}", self.path.display(), reason))
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Malformed credential record");
            StoreError::Unavailable(format!("{}: malformed record: {}", self.path.display(), e))
        })
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let contents = serde_json::to_vec_pretty(record)
            .map_err(|e| StoreError::WriteFailed(format!("serialize: {}", e)))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, &contents))
            .await
            .map_err(|e| StoreError::WriteFailed(format!("writer task: {}", e)))?
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!(path = %self.path.display(), "Credential record saved");
        Ok(())
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
