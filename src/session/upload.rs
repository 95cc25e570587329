// Upload bridge - sends a bulk-load file to the service

use std::path::Path;
use std::sync::Arc;

use crate::api::{ApiError, Backend, UploadResponse};

use super::terminal_log::LogEntry;

/// Log text for an upload that failed without a reason from the service
pub const UPLOAD_FAILURE: &str = "❌ Error uploading file";

/// Reads the selected file and hands it to the backend
#[derive(Clone)]
pub struct UploadBridge {
    backend: Arc<dyn Backend>,
}

impl UploadBridge {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Name the service will see for `path`
    pub fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Read `path` and transmit it as the multipart `file` field.
    pub async fn transmit(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let payload = tokio::fs::read(path).await?;
        self.backend.upload(&Self::file_name(path), payload).await
    }
}

/// The single log line reporting an upload's outcome
pub fn upload_entry(outcome: &Result<UploadResponse, ApiError>) -> LogEntry {
    match outcome {
        Ok(reply) => LogEntry::success(format!("✔ {}", reply.message)),
        Err(err) => match err.rejection_message() {
            Some(message) => LogEntry::error(format!("❌ {}", message)),
            None => LogEntry::error(UPLOAD_FAILURE),
        },
    }
}
