//! ContactFile - Metadata for an attachment stored in the upload service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type recorded when the submitter did not provide one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Attachment metadata row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactFile {
    pub id: i32,
    pub contact_message_id: i32,
    pub file_name: String,
    /// Storage key in the upload service, derived from the message id
    pub object_name: String,
    pub file_size: Option<i64>,
    pub content_type: Option<String>,
    /// Opaque id issued by the upload service
    pub upload_service_file_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// File row to insert after a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct NewContactFile {
    pub contact_message_id: i32,
    pub file_name: String,
    pub object_name: String,
    pub file_size: Option<i64>,
    pub content_type: Option<String>,
    pub upload_service_file_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactFile {
    /// Storage key: `contacts/{contact_id}/{unix_seconds}_{file_name}`
    pub fn object_name(contact_message_id: i32, uploaded_at: DateTime<Utc>, file_name: &str) -> String {
        format!(
            "contacts/{}/{}_{}",
            contact_message_id,
            uploaded_at.timestamp(),
            file_name
        )
    }

    pub fn has_remote_copy(&self) -> bool {
        self.upload_service_file_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

impl NewContactFile {
    /// Materialize the row once the store has assigned an id
    pub fn into_file(self, id: i32) -> ContactFile {
        ContactFile {
            id,
            contact_message_id: self.contact_message_id,
            file_name: self.file_name,
            object_name: self.object_name,
            file_size: self.file_size,
            content_type: self.content_type,
            upload_service_file_id: self.upload_service_file_id,
            created_at: self.created_at,
        }
    }
}
