//! Contact Repository Port
//!
//! Abstract interface for ContactMessage / ContactFile persistence.

use async_trait::async_trait;

use crate::domain::{
    errors::DomainError, ContactFile, ContactMessage, ContactStatus, ContactType, NewContactFile,
};

/// Filters for listing contact messages
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContactListFilter {
    pub status: Option<ContactStatus>,
    pub contact_type: Option<ContactType>,
    /// Rows to skip, newest first
    pub skip: i64,
    /// Maximum rows to return
    pub take: i64,
}

/// Unit of work for creating a message together with its file rows.
///
/// Writes made through a scope become visible only after `commit`. A scope
/// dropped without commit discards its writes.
#[async_trait]
pub trait ContactWriteScope: Send {
    /// Insert the message row; `message.id` and `message.files` are ignored.
    /// Returns the stored row with its generated id and no files.
    async fn insert_message(&mut self, message: &ContactMessage)
        -> Result<ContactMessage, DomainError>;

    /// Insert a file row for a message inserted through this scope
    async fn insert_file(&mut self, file: &NewContactFile) -> Result<ContactFile, DomainError>;

    /// Make all writes visible
    async fn commit(&mut self) -> Result<(), DomainError>;

    /// Discard all writes
    async fn rollback(&mut self) -> Result<(), DomainError>;
}

/// Repository interface for contact messages and their files
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Open a write scope for a create operation
    async fn begin(&self) -> Result<Box<dyn ContactWriteScope>, DomainError>;

    /// Find a message with its files
    async fn find_by_id(&self, id: i32) -> Result<Option<ContactMessage>, DomainError>;

    /// List messages with their files, newest first (ties: higher id first)
    async fn list(&self, filter: &ContactListFilter) -> Result<Vec<ContactMessage>, DomainError>;

    /// Persist status, priority and timestamps of an existing message.
    /// Returns `false` when the message no longer exists.
    async fn update_status(&self, message: &ContactMessage) -> Result<bool, DomainError>;

    /// Delete a message and, by cascade, its files
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;

    /// Files of a message, ordered by id
    async fn find_files(&self, contact_message_id: i32) -> Result<Vec<ContactFile>, DomainError>;

    /// A file, only if it belongs to the given message
    async fn find_file(
        &self,
        contact_message_id: i32,
        file_id: i32,
    ) -> Result<Option<ContactFile>, DomainError>;

    /// Delete a single file row
    async fn delete_file(&self, file_id: i32) -> Result<bool, DomainError>;

    /// Check if a message exists
    async fn exists(&self, id: i32) -> Result<bool, DomainError>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
