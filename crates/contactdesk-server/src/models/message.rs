//! Message service request/response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use contactdesk::{DomainError, Message, MessageDraft, MessageSortType, PaginatedList};

use super::validation::FieldErrors;

const FIELD_MAX_LEN: usize = 50;

/// Create or update message request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub email: String,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub message_content: String,
}

impl MessageRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        FieldErrors::new()
            .required("firstName", &self.first_name, FIELD_MAX_LEN)
            .required("lastName", &self.last_name, FIELD_MAX_LEN)
            .optional("company", self.company.as_deref(), FIELD_MAX_LEN)
            .required("email", &self.email, FIELD_MAX_LEN)
            .email("email", &self.email)
            .optional("telephone", self.telephone.as_deref(), FIELD_MAX_LEN)
            .optional("country", self.country.as_deref(), FIELD_MAX_LEN)
            .required("messageContent", &self.message_content, usize::MAX)
            .finish()
    }
}

impl From<MessageRequest> for MessageDraft {
    fn from(request: MessageRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            company: request.company,
            email: request.email,
            telephone: request.telephone,
            country: request.country,
            message_content: request.message_content,
        }
    }
}

/// Query parameters for the message listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MessageListQuery {
    /// MessageIdAscending (default), MessageIdDescending,
    /// MessageCreatedDateAscending or MessageCreatedDateDescending
    pub sort_type: Option<String>,
    /// Case-insensitive text to look for
    pub query: Option<String>,
    /// 1-indexed page (default 1)
    pub page_number: Option<i64>,
    /// Items per page, 1-100 (default 10)
    pub page_size: Option<i64>,
}

impl MessageListQuery {
    pub fn sort(&self) -> Result<Option<MessageSortType>, DomainError> {
        self.sort_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<MessageSortType>)
            .transpose()
            .map_err(DomainError::Validation)
    }
}

/// Stored message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: String,
    pub telephone: Option<String>,
    pub country: Option<String>,
    pub message_content: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            first_name: message.first_name,
            last_name: message.last_name,
            company: message.company,
            email: message.email,
            telephone: message.telephone,
            country: message.country,
            message_content: message.message_content,
            created_date: message.created_date,
            modified_date: message.modified_date,
        }
    }
}

/// One page of messages
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessagePageResponse {
    pub items: Vec<MessageResponse>,
    pub page_index: i64,
    pub total_pages: i64,
    pub total_records: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<PaginatedList<Message>> for MessagePageResponse {
    fn from(page: PaginatedList<Message>) -> Self {
        let has_previous_page = page.has_previous_page();
        let has_next_page = page.has_next_page();
        let page = page.map(MessageResponse::from);

        Self {
            items: page.items,
            page_index: page.page_index,
            total_pages: page.total_pages,
            total_records: page.total_records,
            has_previous_page,
            has_next_page,
        }
    }
}
