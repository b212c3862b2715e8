//! Message Application Service (Use Case)
//!
//! CRUD and paginated search over message-service records.

use std::sync::Arc;

use chrono::Utc;

use contactdesk::{
    DomainError, Message, MessageDraft, MessageRepository, MessageSearch, MessageSortType,
    PaginatedList,
};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Application service for Message operations
pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, draft: MessageDraft) -> Result<Message, DomainError> {
        let message = Message::new(draft, Utc::now());
        let saved = self.repo.insert(&message).await?;

        tracing::info!(message_id = saved.id, "Created message");
        Ok(saved)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Message>, DomainError> {
        self.repo.find_by_id(id).await
    }

    /// Search, sort and paginate. Page defaults to 1 and page size to 10,
    /// clamped to 1..=100.
    pub async fn get_paginated(
        &self,
        sort: Option<MessageSortType>,
        query: Option<String>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<PaginatedList<Message>, DomainError> {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let query = query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let (items, total) = self
            .repo
            .search(&MessageSearch {
                query,
                sort: sort.unwrap_or_default(),
                skip: (page - 1).saturating_mul(page_size),
                take: page_size,
            })
            .await?;

        Ok(PaginatedList::new(items, total, page, page_size))
    }

    pub async fn update(&self, id: i32, draft: MessageDraft) -> Result<Message, DomainError> {
        let mut message = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Message", id))?;

        message.apply(draft, Utc::now());

        if !self.repo.update(&message).await? {
            return Err(DomainError::not_found("Message", id));
        }

        tracing::info!(message_id = id, "Updated message");
        Ok(message)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("Message", id));
        }

        tracing::info!(message_id = id, "Deleted message");
        Ok(())
    }

    /// Readiness check
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repo.ping().await
    }
}
