use chrono::{DateTime, Utc};

/// A call recording as uploaded by the client.
#[derive(Debug, Clone)]
pub struct CallRecording {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl CallRecording {
    pub fn new(data: Vec<u8>, filename: Option<String>, content_type: Option<String>) -> Self {
        Self {
            data,
            filename,
            content_type,
            received_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension hint derived from the uploaded file name, if any.
    pub fn extension(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    }
}
