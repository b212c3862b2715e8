//! Upload Client Port
//!
//! Abstract interface for the remote file-storage service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;

/// Receipt returned by the storage service after an upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Opaque id used for later download and delete calls
    pub file_id: String,
    pub object_name: String,
    pub bucket: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// File content fetched back from the storage service
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub content: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
    pub file_size: i64,
}

/// Service interface for remote file storage
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Store `content` under `object_name`
    async fn upload(
        &self,
        object_name: &str,
        content: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<UploadedFile, DomainError>;

    /// Delete a stored file.
    ///
    /// `Ok(false)` means the service refused or could not be reached; a file
    /// that is already gone counts as deleted.
    async fn delete(&self, file_id: &str) -> Result<bool, DomainError>;

    /// Fetch a stored file
    async fn download(&self, file_id: &str) -> Result<DownloadedFile, DomainError>;
}
