//! PostgreSQL implementation of ContactRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use contactdesk::{
    ContactFile, ContactListFilter, ContactMessage, ContactRepository, ContactStatus,
    ContactType, ContactWriteScope, DomainError, NewContactFile, Priority,
};

/// PostgreSQL implementation of ContactRepository
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_files(
        &self,
        messages: Vec<ContactMessage>,
    ) -> Result<Vec<ContactMessage>, DomainError> {
        if messages.is_empty() {
            return Ok(messages);
        }

        let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
        let rows = sqlx::query_as::<_, ContactFileRow>(
            "SELECT * FROM contact_files WHERE contact_message_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let mut by_message: HashMap<i32, Vec<ContactFile>> = HashMap::new();
        for row in rows {
            by_message
                .entry(row.contact_message_id)
                .or_default()
                .push(row.into());
        }

        Ok(messages
            .into_iter()
            .map(|mut message| {
                message.files = by_message.remove(&message.id).unwrap_or_default();
                message
            })
            .collect())
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ContactMessageRow {
    id: i32,
    full_name: String,
    email: String,
    phone_number: Option<String>,
    company: Option<String>,
    subject: String,
    message: String,
    contact_type: i32,
    priority: i32,
    status: i32,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    resolved_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TryFrom<ContactMessageRow> for ContactMessage {
    type Error = DomainError;

    fn try_from(row: ContactMessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            company: row.company,
            subject: row.subject,
            message: row.message,
            contact_type: ContactType::try_from(row.contact_type).map_err(DomainError::Repository)?,
            priority: Priority::try_from(row.priority).map_err(DomainError::Repository)?,
            status: ContactStatus::try_from(row.status).map_err(DomainError::Repository)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            resolved_at: row.resolved_at,
            files: Vec::new(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ContactFileRow {
    id: i32,
    contact_message_id: i32,
    file_name: String,
    object_name: String,
    file_size: Option<i64>,
    content_type: Option<String>,
    upload_service_file_id: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ContactFileRow> for ContactFile {
    fn from(row: ContactFileRow) -> Self {
        Self {
            id: row.id,
            contact_message_id: row.contact_message_id,
            file_name: row.file_name,
            object_name: row.object_name,
            file_size: row.file_size,
            content_type: row.content_type,
            upload_service_file_id: row.upload_service_file_id,
            created_at: row.created_at,
        }
    }
}

/// Write scope backed by a database transaction.
///
/// Dropping it without `commit` rolls the transaction back.
pub struct PgWriteScope {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgWriteScope {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, DomainError> {
        self.tx
            .as_mut()
            .ok_or_else(|| DomainError::Repository("write scope already closed".to_string()))
    }
}

#[async_trait]
impl ContactWriteScope for PgWriteScope {
    async fn insert_message(
        &mut self,
        message: &ContactMessage,
    ) -> Result<ContactMessage, DomainError> {
        let tx = self.tx()?;
        let row = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            INSERT INTO contact_messages
                (full_name, email, phone_number, company, subject, message,
                 contact_type, priority, status, created_at, updated_at, resolved_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&message.full_name)
        .bind(&message.email)
        .bind(&message.phone_number)
        .bind(&message.company)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.contact_type.as_i32())
        .bind(message.priority.as_i32())
        .bind(message.status.as_i32())
        .bind(message.created_at)
        .bind(message.updated_at)
        .bind(message.resolved_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn insert_file(&mut self, file: &NewContactFile) -> Result<ContactFile, DomainError> {
        let tx = self.tx()?;
        let row = sqlx::query_as::<_, ContactFileRow>(
            r#"
            INSERT INTO contact_files
                (contact_message_id, file_name, object_name, file_size, content_type,
                 upload_service_file_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(file.contact_message_id)
        .bind(&file.file_name)
        .bind(&file.object_name)
        .bind(file.file_size)
        .bind(&file.content_type)
        .bind(&file.upload_service_file_id)
        .bind(file.created_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        if let Some(tx) = self.tx.take() {
            tx.commit()
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback()
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn begin(&self) -> Result<Box<dyn ContactWriteScope>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(Box::new(PgWriteScope { tx: Some(tx) }))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ContactMessage>, DomainError> {
        let row = sqlx::query_as::<_, ContactMessageRow>(
            "SELECT * FROM contact_messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut message = ContactMessage::try_from(row)?;
        message.files = self.find_files(id).await?;
        Ok(Some(message))
    }

    async fn list(&self, filter: &ContactListFilter) -> Result<Vec<ContactMessage>, DomainError> {
        let rows = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            SELECT * FROM contact_messages
            WHERE ($1::int IS NULL OR status = $1)
              AND ($2::int IS NULL OR contact_type = $2)
            ORDER BY created_at DESC, id DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(filter.status.map(ContactStatus::as_i32))
        .bind(filter.contact_type.map(ContactType::as_i32))
        .bind(filter.skip.max(0))
        .bind(filter.take.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let messages = rows
            .into_iter()
            .map(ContactMessage::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        self.attach_files(messages).await
    }

    async fn update_status(&self, message: &ContactMessage) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE contact_messages
            SET status = $2, priority = $3, updated_at = $4, resolved_at = $5
            WHERE id = $1
            "#,
        )
        .bind(message.id)
        .bind(message.status.as_i32())
        .bind(message.priority.as_i32())
        .bind(message.updated_at)
        .bind(message.resolved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_files(&self, contact_message_id: i32) -> Result<Vec<ContactFile>, DomainError> {
        let rows = sqlx::query_as::<_, ContactFileRow>(
            "SELECT * FROM contact_files WHERE contact_message_id = $1 ORDER BY id",
        )
        .bind(contact_message_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_file(
        &self,
        contact_message_id: i32,
        file_id: i32,
    ) -> Result<Option<ContactFile>, DomainError> {
        let row = sqlx::query_as::<_, ContactFileRow>(
            "SELECT * FROM contact_files WHERE id = $1 AND contact_message_id = $2",
        )
        .bind(file_id)
        .bind(contact_message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn delete_file(&self, file_id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM contact_files WHERE id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM contact_messages WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;
        Ok(())
    }
}
