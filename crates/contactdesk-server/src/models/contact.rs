//! Contact message request/response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use contactdesk::{
    Attachment, ContactFile, ContactMessage, ContactStatus, ContactType, DomainError,
    NewContactMessage, Priority,
};

use super::validation::FieldErrors;

pub const DEFAULT_CONTACT_PAGE_SIZE: i64 = 20;
pub const MAX_CONTACT_PAGE_SIZE: i64 = 100;

/// Create contact message request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub contact_type: ContactType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub files: Vec<CreateContactFileRequest>,
}

/// Attachment sent inline with a contact message
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactFileRequest {
    pub file_name: String,
    /// Base64-encoded file bytes
    #[serde(deserialize_with = "base64_content")]
    #[schema(value_type = String, format = Byte)]
    pub file_content: Vec<u8>,
    #[serde(default)]
    pub content_type: Option<String>,
}

fn base64_content<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let encoded = String::deserialize(deserializer)?;
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| serde::de::Error::custom(format!("fileContent is not valid base64: {e}")))
}

impl CreateContactRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();
        errors
            .required("fullName", &self.full_name, 200)
            .required("email", &self.email, 254)
            .email("email", &self.email)
            .optional("phoneNumber", self.phone_number.as_deref(), 20)
            .optional("company", self.company.as_deref(), 200)
            .required("subject", &self.subject, 500)
            .required("message", &self.message, 10_000);

        for (index, file) in self.files.iter().enumerate() {
            errors
                .required(&format!("files[{}].fileName", index), &file.file_name, 255)
                .optional(
                    &format!("files[{}].contentType", index),
                    file.content_type.as_deref(),
                    100,
                );
        }

        errors.finish()
    }
}

impl From<CreateContactRequest> for NewContactMessage {
    fn from(request: CreateContactRequest) -> Self {
        Self {
            full_name: request.full_name,
            email: request.email,
            phone_number: request.phone_number,
            company: request.company,
            subject: request.subject,
            message: request.message,
            contact_type: request.contact_type,
            priority: request.priority,
            attachments: request
                .files
                .into_iter()
                .map(|file| Attachment {
                    file_name: file.file_name,
                    content: file.file_content,
                    content_type: file.content_type,
                })
                .collect(),
        }
    }
}

/// Update contact status request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactStatusRequest {
    pub status: ContactStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Query parameters for listing contact messages
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListContactsQuery {
    /// 1-indexed page (default 1)
    pub page: Option<i64>,
    /// Items per page, 1-100 (default 20)
    pub page_size: Option<i64>,
    /// Status name or number
    pub status: Option<String>,
    /// Contact type name or number
    pub contact_type: Option<String>,
}

/// Parsed list parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactListParams {
    pub page: i64,
    pub page_size: i64,
    pub status: Option<ContactStatus>,
    pub contact_type: Option<ContactType>,
}

impl ListContactsQuery {
    /// Page below 1 becomes 1; a page size outside 1..=100 falls back to 20
    pub fn parse(&self) -> Result<ContactListParams, DomainError> {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = match self.page_size {
            Some(size) if (1..=MAX_CONTACT_PAGE_SIZE).contains(&size) => size,
            _ => DEFAULT_CONTACT_PAGE_SIZE,
        };

        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<ContactStatus>)
            .transpose()
            .map_err(DomainError::Validation)?;
        let contact_type = self
            .contact_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<ContactType>)
            .transpose()
            .map_err(DomainError::Validation)?;

        Ok(ContactListParams {
            page,
            page_size,
            status,
            contact_type,
        })
    }
}

/// Contact message with its files
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub contact_type: ContactType,
    pub priority: Priority,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub files: Vec<ContactFileResponse>,
}

/// Attachment metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactFileResponse {
    pub id: i32,
    pub file_name: String,
    pub object_name: String,
    pub file_size: Option<i64>,
    pub content_type: Option<String>,
    pub upload_service_file_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ContactFile> for ContactFileResponse {
    fn from(file: ContactFile) -> Self {
        Self {
            id: file.id,
            file_name: file.file_name,
            object_name: file.object_name,
            file_size: file.file_size,
            content_type: file.content_type,
            upload_service_file_id: file.upload_service_file_id,
            created_at: file.created_at,
        }
    }
}

impl From<ContactMessage> for ContactMessageResponse {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id,
            full_name: message.full_name,
            email: message.email,
            phone_number: message.phone_number,
            company: message.company,
            subject: message.subject,
            message: message.message,
            contact_type: message.contact_type,
            priority: message.priority,
            status: message.status,
            created_at: message.created_at,
            updated_at: message.updated_at,
            resolved_at: message.resolved_at,
            files: message.files.into_iter().map(Into::into).collect(),
        }
    }
}
