//! Message Repository Port
//!
//! Abstract interface for message-service persistence.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Message, MessageSortType};

/// Search parameters for paginated message queries
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MessageSearch {
    /// Case-insensitive substring; `None` matches everything
    pub query: Option<String>,
    pub sort: MessageSortType,
    pub skip: i64,
    pub take: i64,
}

/// Repository interface for Message entities
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a message; `message.id` is ignored
    async fn insert(&self, message: &Message) -> Result<Message, DomainError>;

    /// Find a message by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Message>, DomainError>;

    /// One page of matches plus the total number of matches
    async fn search(&self, search: &MessageSearch) -> Result<(Vec<Message>, i64), DomainError>;

    /// Overwrite an existing message. Returns `false` when it does not exist.
    async fn update(&self, message: &Message) -> Result<bool, DomainError>;

    /// Delete a message by ID
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
