//! In-memory implementation of MessageRepository

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use contactdesk::{DomainError, Message, MessageRepository, MessageSearch, MessageSortType};

#[derive(Default)]
struct MessageTable {
    rows: BTreeMap<i32, Message>,
    last_id: i32,
}

/// In-memory implementation of MessageRepository
#[derive(Default)]
pub struct InMemoryMessageRepository {
    table: Mutex<MessageTable>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MessageTable>, DomainError> {
        self.table
            .lock()
            .map_err(|_| DomainError::Repository("message store lock poisoned".to_string()))
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &Message) -> Result<Message, DomainError> {
        let mut table = self.lock()?;
        table.last_id += 1;

        let stored = Message {
            id: table.last_id,
            ..message.clone()
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Message>, DomainError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn search(&self, search: &MessageSearch) -> Result<(Vec<Message>, i64), DomainError> {
        let table = self.lock()?;

        let mut matches: Vec<&Message> = table
            .rows
            .values()
            .filter(|m| search.query.as_deref().map_or(true, |q| m.matches(q)))
            .collect();

        match search.sort {
            MessageSortType::MessageIdAscending => matches.sort_by_key(|m| m.id),
            MessageSortType::MessageIdDescending => matches.sort_by(|a, b| b.id.cmp(&a.id)),
            MessageSortType::MessageCreatedDateAscending => {
                matches.sort_by(|a, b| a.created_date.cmp(&b.created_date).then(a.id.cmp(&b.id)))
            }
            MessageSortType::MessageCreatedDateDescending => {
                matches.sort_by(|a, b| b.created_date.cmp(&a.created_date).then(b.id.cmp(&a.id)))
            }
        }

        let total = matches.len() as i64;
        let page = matches
            .into_iter()
            .skip(search.skip.max(0) as usize)
            .take(search.take.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn update(&self, message: &Message) -> Result<bool, DomainError> {
        let mut table = self.lock()?;
        match table.rows.get_mut(&message.id) {
            Some(stored) => {
                *stored = message.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.lock().map(|_| ())
    }
}
