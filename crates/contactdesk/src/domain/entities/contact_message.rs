//! ContactMessage - A customer contact-form submission
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ContactFile;
use crate::domain::value_objects::{ContactStatus, ContactType, Priority};

/// Cache key for the materialized view of a contact message
pub fn contact_cache_key(id: i32) -> String {
    format!("contact_message_{}", id)
}

/// ContactMessage aggregate: the message row plus its attached files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Store-generated identity; 0 until persisted
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
    pub files: Vec<ContactFile>,
}

/// A file attached to a submission, still held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content: Vec<u8>,
    pub content_type: Option<String>,
}

/// Incoming submission from the contact form
#[derive(Debug, Clone, PartialEq)]
pub struct NewContactMessage {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub contact_type: ContactType,
    pub priority: Priority,
    pub attachments: Vec<Attachment>,
}

impl NewContactMessage {
    /// Create a submission with default classification and no attachments
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone_number: None,
            company: None,
            subject: subject.into(),
            message: message.into(),
            contact_type: ContactType::default(),
            priority: Priority::default(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

impl ContactMessage {
    /// Build the unsaved row for a submission. Status starts at `New` and both
    /// timestamps are `now`.
    pub fn from_submission(submission: &NewContactMessage, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            full_name: submission.full_name.clone(),
            email: submission.email.clone(),
            phone_number: submission.phone_number.clone(),
            company: submission.company.clone(),
            subject: submission.subject.clone(),
            message: submission.message.clone(),
            contact_type: submission.contact_type,
            priority: submission.priority,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            files: Vec::new(),
        }
    }

    /// Move the message to `status`, optionally reprioritising it.
    ///
    /// `resolved_at` is stamped the first time the message becomes `Resolved`
    /// and never changes afterwards.
    pub fn apply_status_change(
        &mut self,
        status: ContactStatus,
        priority: Option<Priority>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        if let Some(priority) = priority {
            self.priority = priority;
        }

        // Clock skew must not push updated_at behind created_at
        self.updated_at = now.max(self.created_at);

        if status == ContactStatus::Resolved && self.resolved_at.is_none() {
            self.resolved_at = Some(self.updated_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn saved_message() -> ContactMessage {
        let submission = NewContactMessage::new("John Doe", "john@x.com", "S", "M");
        let mut message = ContactMessage::from_submission(&submission, Utc::now());
        message.id = 7;
        message
    }

    #[test]
    fn test_from_submission_defaults() {
        let submission = NewContactMessage::new("John Doe", "john@x.com", "S", "M");
        let now = Utc::now();
        let message = ContactMessage::from_submission(&submission, now);

        assert_eq!(message.status, ContactStatus::New);
        assert_eq!(message.priority, Priority::Medium);
        assert_eq!(message.contact_type, ContactType::General);
        assert_eq!(message.created_at, message.updated_at);
        assert!(message.resolved_at.is_none());
        assert!(message.files.is_empty());
    }

    #[test]
    fn test_resolving_sets_resolved_at_once() {
        let mut message = saved_message();
        let first = message.created_at + Duration::seconds(10);
        message.apply_status_change(ContactStatus::Resolved, None, first);
        assert_eq!(message.resolved_at, Some(first));

        let second = first + Duration::seconds(10);
        message.apply_status_change(ContactStatus::Resolved, None, second);
        assert_eq!(message.resolved_at, Some(first));
        assert_eq!(message.updated_at, second);
    }

    #[test]
    fn test_non_resolved_status_leaves_resolved_at_unset() {
        let mut message = saved_message();
        message.apply_status_change(
            ContactStatus::InProgress,
            Some(Priority::Urgent),
            Utc::now(),
        );
        assert_eq!(message.status, ContactStatus::InProgress);
        assert_eq!(message.priority, Priority::Urgent);
        assert!(message.resolved_at.is_none());
    }

    #[test]
    fn test_updated_at_never_precedes_created_at() {
        let mut message = saved_message();
        let earlier = message.created_at - Duration::minutes(5);
        message.apply_status_change(ContactStatus::Closed, None, earlier);
        assert_eq!(message.updated_at, message.created_at);
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(contact_cache_key(12), "contact_message_12");
    }
}
