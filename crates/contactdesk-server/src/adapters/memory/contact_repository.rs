//! In-memory implementation of ContactRepository
//!
//! Used by tests and by local runs without `DATABASE_URL`. Write scopes stage
//! their rows and apply them to the shared tables on commit.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use contactdesk::{
    ContactFile, ContactListFilter, ContactMessage, ContactRepository, ContactWriteScope,
    DomainError, NewContactFile,
};

#[derive(Default)]
struct ContactTables {
    /// Message rows; `files` is always empty here
    messages: BTreeMap<i32, ContactMessage>,
    files: BTreeMap<i32, ContactFile>,
    last_message_id: i32,
    last_file_id: i32,
}

impl ContactTables {
    fn with_files(&self, mut message: ContactMessage) -> ContactMessage {
        message.files = self
            .files
            .values()
            .filter(|file| file.contact_message_id == message.id)
            .cloned()
            .collect();
        message
    }
}

fn lock(tables: &Mutex<ContactTables>) -> Result<MutexGuard<'_, ContactTables>, DomainError> {
    tables
        .lock()
        .map_err(|_| DomainError::Repository("contact store lock poisoned".to_string()))
}

/// In-memory implementation of ContactRepository
#[derive(Default, Clone)]
pub struct InMemoryContactRepository {
    tables: Arc<Mutex<ContactTables>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored message rows
    pub fn message_count(&self) -> usize {
        self.tables
            .lock()
            .map(|tables| tables.messages.len())
            .unwrap_or_default()
    }

    /// Number of stored file rows
    pub fn file_count(&self) -> usize {
        self.tables
            .lock()
            .map(|tables| tables.files.len())
            .unwrap_or_default()
    }
}

/// Staged writes of one create operation
pub struct InMemoryWriteScope {
    tables: Arc<Mutex<ContactTables>>,
    messages: Vec<ContactMessage>,
    files: Vec<ContactFile>,
}

#[async_trait]
impl ContactWriteScope for InMemoryWriteScope {
    async fn insert_message(
        &mut self,
        message: &ContactMessage,
    ) -> Result<ContactMessage, DomainError> {
        let id = {
            let mut tables = lock(&self.tables)?;
            tables.last_message_id += 1;
            tables.last_message_id
        };

        let stored = ContactMessage {
            id,
            files: Vec::new(),
            ..message.clone()
        };
        self.messages.push(stored.clone());
        Ok(stored)
    }

    async fn insert_file(&mut self, file: &NewContactFile) -> Result<ContactFile, DomainError> {
        let parent_staged = self
            .messages
            .iter()
            .any(|message| message.id == file.contact_message_id);

        let id = {
            let mut tables = lock(&self.tables)?;
            if !parent_staged && !tables.messages.contains_key(&file.contact_message_id) {
                return Err(DomainError::Repository(format!(
                    "contact message {} does not exist",
                    file.contact_message_id
                )));
            }
            tables.last_file_id += 1;
            tables.last_file_id
        };

        let stored = file.clone().into_file(id);
        self.files.push(stored.clone());
        Ok(stored)
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let mut tables = lock(&self.tables)?;
        for message in self.messages.drain(..) {
            tables.messages.insert(message.id, message);
        }
        for file in self.files.drain(..) {
            tables.files.insert(file.id, file);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        self.messages.clear();
        self.files.clear();
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn begin(&self) -> Result<Box<dyn ContactWriteScope>, DomainError> {
        Ok(Box::new(InMemoryWriteScope {
            tables: Arc::clone(&self.tables),
            messages: Vec::new(),
            files: Vec::new(),
        }))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ContactMessage>, DomainError> {
        let tables = lock(&self.tables)?;
        Ok(tables
            .messages
            .get(&id)
            .cloned()
            .map(|message| tables.with_files(message)))
    }

    async fn list(&self, filter: &ContactListFilter) -> Result<Vec<ContactMessage>, DomainError> {
        let tables = lock(&self.tables)?;

        let mut matching: Vec<&ContactMessage> = tables
            .messages
            .values()
            .filter(|m| filter.status.map_or(true, |status| m.status == status))
            .filter(|m| {
                filter
                    .contact_type
                    .map_or(true, |contact_type| m.contact_type == contact_type)
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(matching
            .into_iter()
            .skip(filter.skip.max(0) as usize)
            .take(filter.take.max(0) as usize)
            .map(|message| tables.with_files(message.clone()))
            .collect())
    }

    async fn update_status(&self, message: &ContactMessage) -> Result<bool, DomainError> {
        let mut tables = lock(&self.tables)?;
        match tables.messages.get_mut(&message.id) {
            Some(stored) => {
                stored.status = message.status;
                stored.priority = message.priority;
                stored.updated_at = message.updated_at;
                stored.resolved_at = message.resolved_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut tables = lock(&self.tables)?;
        if tables.messages.remove(&id).is_none() {
            return Ok(false);
        }
        tables.files.retain(|_, file| file.contact_message_id != id);
        Ok(true)
    }

    async fn find_files(&self, contact_message_id: i32) -> Result<Vec<ContactFile>, DomainError> {
        let tables = lock(&self.tables)?;
        Ok(tables
            .files
            .values()
            .filter(|file| file.contact_message_id == contact_message_id)
            .cloned()
            .collect())
    }

    async fn find_file(
        &self,
        contact_message_id: i32,
        file_id: i32,
    ) -> Result<Option<ContactFile>, DomainError> {
        let tables = lock(&self.tables)?;
        Ok(tables
            .files
            .get(&file_id)
            .filter(|file| file.contact_message_id == contact_message_id)
            .cloned())
    }

    async fn delete_file(&self, file_id: i32) -> Result<bool, DomainError> {
        let mut tables = lock(&self.tables)?;
        Ok(tables.files.remove(&file_id).is_some())
    }

    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let tables = lock(&self.tables)?;
        Ok(tables.messages.contains_key(&id))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        lock(&self.tables).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use contactdesk::{ContactStatus, NewContactMessage};

    fn unsaved(subject: &str) -> ContactMessage {
        ContactMessage::from_submission(
            &NewContactMessage::new("Jane Roe", "jane@example.com", subject, "Hello"),
            Utc::now(),
        )
    }

    fn file_for(contact_message_id: i32) -> NewContactFile {
        NewContactFile {
            contact_message_id,
            file_name: "drawing.step".to_string(),
            object_name: format!("contacts/{}/0_drawing.step", contact_message_id),
            file_size: Some(12),
            content_type: Some("application/step".to_string()),
            upload_service_file_id: Some("remote-1".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let repo = InMemoryContactRepository::new();
        let mut scope = repo.begin().await.unwrap();
        let message = scope.insert_message(&unsaved("S")).await.unwrap();
        scope.insert_file(&file_for(message.id)).await.unwrap();

        assert!(repo.find_by_id(message.id).await.unwrap().is_none());

        scope.commit().await.unwrap();
        let stored = repo.find_by_id(message.id).await.unwrap().unwrap();
        assert_eq!(stored.files.len(), 1);
        assert_eq!(stored.files[0].contact_message_id, message.id);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let repo = InMemoryContactRepository::new();
        let mut scope = repo.begin().await.unwrap();
        let message = scope.insert_message(&unsaved("S")).await.unwrap();
        scope.insert_file(&file_for(message.id)).await.unwrap();
        scope.rollback().await.unwrap();
        scope.commit().await.unwrap();

        assert_eq!(repo.message_count(), 0);
        assert_eq!(repo.file_count(), 0);
    }

    #[tokio::test]
    async fn test_insert_file_requires_parent() {
        let repo = InMemoryContactRepository::new();
        let mut scope = repo.begin().await.unwrap();

        let result = scope.insert_file(&file_for(99)).await;
        assert!(matches!(result, Err(DomainError::Repository(_))));
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_filters() {
        let repo = InMemoryContactRepository::new();
        let base = Utc::now();
        let mut scope = repo.begin().await.unwrap();
        for offset in 0..3 {
            let mut message = unsaved(&format!("S{}", offset));
            message.created_at = base + Duration::seconds(offset);
            message.updated_at = message.created_at;
            if offset == 1 {
                message.status = ContactStatus::Closed;
            }
            scope.insert_message(&message).await.unwrap();
        }
        scope.commit().await.unwrap();

        let all = repo
            .list(&ContactListFilter {
                take: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        let subjects: Vec<&str> = all.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["S2", "S1", "S0"]);

        let closed = repo
            .list(&ContactListFilter {
                status: Some(ContactStatus::Closed),
                take: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].subject, "S1");
    }

    #[tokio::test]
    async fn test_delete_cascades_to_files() {
        let repo = InMemoryContactRepository::new();
        let mut scope = repo.begin().await.unwrap();
        let message = scope.insert_message(&unsaved("S")).await.unwrap();
        scope.insert_file(&file_for(message.id)).await.unwrap();
        scope.commit().await.unwrap();

        assert!(repo.delete(message.id).await.unwrap());
        assert_eq!(repo.file_count(), 0);
        assert!(!repo.delete(message.id).await.unwrap());
    }
}
