//! Contact Application Service (Use Case)
//!
//! Orchestrates contact-message persistence, attachment uploads and the
//! read-through cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use contactdesk::domain::DEFAULT_CONTENT_TYPE;
use contactdesk::{
    contact_cache_key, Attachment, ContactCache, ContactFile, ContactListFilter, ContactMessage,
    ContactRepository, ContactStatus, ContactType, ContactWriteScope, DomainError,
    DownloadedFile, NewContactFile, NewContactMessage, Priority, UploadClient,
};

/// Application service for contact messages
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    uploads: Arc<dyn UploadClient>,
    cache: Arc<dyn ContactCache>,
    cache_ttl: Duration,
}

impl ContactService {
    pub fn new(
        repo: Arc<dyn ContactRepository>,
        uploads: Arc<dyn UploadClient>,
        cache: Arc<dyn ContactCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repo,
            uploads,
            cache,
            cache_ttl,
        }
    }

    /// Store a submission and upload its attachments.
    ///
    /// An attachment whose upload fails is logged and left out of the result;
    /// the submission itself still succeeds. Store failures roll back every
    /// row written by this call.
    pub async fn create(&self, submission: NewContactMessage) -> Result<ContactMessage, DomainError> {
        let mut scope = self.repo.begin().await?;

        let id = match self.write_submission(scope.as_mut(), &submission).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create contact message, rolling back");
                if let Err(rollback_err) = scope.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback failed");
                }
                return Err(e);
            }
        };

        scope.commit().await?;
        tracing::info!(contact_id = id, "Created contact message");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ContactMessage", id))
    }

    async fn write_submission(
        &self,
        scope: &mut dyn ContactWriteScope,
        submission: &NewContactMessage,
    ) -> Result<i32, DomainError> {
        let message = ContactMessage::from_submission(submission, Utc::now());
        let saved = scope.insert_message(&message).await?;

        for attachment in &submission.attachments {
            let Some(file) = self.upload_attachment(saved.id, attachment).await else {
                continue;
            };
            scope.insert_file(&file).await?;
        }

        Ok(saved.id)
    }

    /// Upload one attachment; `None` when the upload service refused it
    async fn upload_attachment(
        &self,
        contact_id: i32,
        attachment: &Attachment,
    ) -> Option<NewContactFile> {
        let now = Utc::now();
        let object_name = ContactFile::object_name(contact_id, now, &attachment.file_name);
        let content_type = attachment
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        match self
            .uploads
            .upload(
                &object_name,
                attachment.content.clone(),
                content_type,
                &attachment.file_name,
            )
            .await
        {
            Ok(uploaded) => Some(NewContactFile {
                contact_message_id: contact_id,
                file_name: attachment.file_name.clone(),
                object_name,
                file_size: Some(uploaded.file_size),
                content_type: Some(content_type.to_string()),
                upload_service_file_id: Some(uploaded.file_id),
                created_at: now,
            }),
            Err(e) => {
                tracing::error!(
                    contact_id,
                    object_name = %object_name,
                    file_name = %attachment.file_name,
                    error = %e,
                    "Failed to upload attachment, skipping it"
                );
                None
            }
        }
    }

    /// Get a message with its files, served from cache when possible
    pub async fn get_by_id(&self, id: i32) -> Result<Option<ContactMessage>, DomainError> {
        let key = contact_cache_key(id);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(Some(cached));
        }

        let Some(message) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };

        self.cache.set(&key, message.clone(), self.cache_ttl);
        Ok(Some(message))
    }

    /// One page of messages, newest first. Pages past the end are empty.
    pub async fn list(
        &self,
        page: i64,
        page_size: i64,
        status: Option<ContactStatus>,
        contact_type: Option<ContactType>,
    ) -> Result<Vec<ContactMessage>, DomainError> {
        self.repo
            .list(&ContactListFilter {
                status,
                contact_type,
                skip: (page - 1).saturating_mul(page_size),
                take: page_size,
            })
            .await
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: ContactStatus,
        priority: Option<Priority>,
    ) -> Result<ContactMessage, DomainError> {
        let mut message = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ContactMessage", id))?;

        message.apply_status_change(status, priority, Utc::now());

        if !self.repo.update_status(&message).await? {
            return Err(DomainError::not_found("ContactMessage", id));
        }
        self.cache.remove(&contact_cache_key(id));

        tracing::info!(contact_id = id, status = %status, "Updated contact status");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ContactMessage", id))
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("ContactMessage", id));
        }
        self.cache.remove(&contact_cache_key(id));

        tracing::info!(contact_id = id, "Deleted contact message");
        Ok(())
    }

    pub async fn list_files(&self, contact_id: i32) -> Result<Vec<ContactFile>, DomainError> {
        if !self.repo.exists(contact_id).await? {
            return Err(DomainError::not_found("ContactMessage", contact_id));
        }
        self.repo.find_files(contact_id).await
    }

    /// Delete one attachment. The remote copy is removed best-effort first.
    pub async fn delete_file(&self, contact_id: i32, file_id: i32) -> Result<(), DomainError> {
        let file = self
            .repo
            .find_file(contact_id, file_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ContactFile", file_id))?;

        if let Some(remote_id) = file
            .upload_service_file_id
            .as_deref()
            .filter(|id| !id.is_empty())
        {
            match self.uploads.delete(remote_id).await {
                Ok(true) => {}
                Ok(false) => tracing::warn!(
                    contact_id,
                    file_id,
                    remote_id,
                    "Upload service did not delete file"
                ),
                Err(e) => tracing::warn!(
                    contact_id,
                    file_id,
                    remote_id,
                    error = %e,
                    "Failed to delete file from upload service"
                ),
            }
        }

        if !self.repo.delete_file(file_id).await? {
            return Err(DomainError::not_found("ContactFile", file_id));
        }
        self.cache.remove(&contact_cache_key(contact_id));

        tracing::info!(contact_id, file_id, "Deleted contact file");
        Ok(())
    }

    /// Fetch an attachment's content from the upload service
    pub async fn download_file(
        &self,
        contact_id: i32,
        file_id: i32,
    ) -> Result<(ContactFile, DownloadedFile), DomainError> {
        let file = self
            .repo
            .find_file(contact_id, file_id)
            .await?
            .filter(ContactFile::has_remote_copy)
            .ok_or_else(|| DomainError::not_found("ContactFile", file_id))?;

        let remote_id = file.upload_service_file_id.clone().unwrap_or_default();
        let downloaded = self.uploads.download(&remote_id).await?;
        Ok((file, downloaded))
    }

    /// Readiness check
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repo.ping().await
    }
}
