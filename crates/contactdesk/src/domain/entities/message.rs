//! Message - A stored contact message (message service)
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
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

/// Writable fields of a message, used for both create and update
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageDraft {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: String,
    pub telephone: Option<String>,
    pub country: Option<String>,
    pub message_content: String,
}

impl Message {
    /// Create an unsaved message from a draft
    pub fn new(draft: MessageDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            first_name: draft.first_name,
            last_name: draft.last_name,
            company: draft.company,
            email: draft.email,
            telephone: draft.telephone,
            country: draft.country,
            message_content: draft.message_content,
            created_date: now,
            modified_date: now,
        }
    }

    /// Overwrite every writable field and bump the modification date
    pub fn apply(&mut self, draft: MessageDraft, now: DateTime<Utc>) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.company = draft.company;
        self.email = draft.email;
        self.telephone = draft.telephone;
        self.country = draft.country;
        self.message_content = draft.message_content;
        self.modified_date = now.max(self.created_date);
    }

    /// Case-insensitive substring match over the searchable fields and the id
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&needle);

        contains(&self.first_name)
            || contains(&self.last_name)
            || self.company.as_deref().is_some_and(contains)
            || contains(&self.email)
            || self.telephone.as_deref().is_some_and(contains)
            || self.country.as_deref().is_some_and(contains)
            || contains(&self.message_content)
            || self.id.to_string().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> MessageDraft {
        MessageDraft {
            first_name: "Somchai".to_string(),
            last_name: "Jaidee".to_string(),
            company: Some("Siam Parts".to_string()),
            email: "somchai@example.com".to_string(),
            telephone: None,
            country: Some("Thailand".to_string()),
            message_content: "Need a quote for CNC machining".to_string(),
        }
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let mut message = Message::new(draft(), Utc::now());
        message.id = 314;

        assert!(message.matches("cnc"));
        assert!(message.matches("SIAM"));
        assert!(message.matches("thai"));
        assert!(message.matches("31"));
        assert!(!message.matches("germany"));
    }

    #[test]
    fn test_apply_bumps_modified_date() {
        let created = Utc::now();
        let mut message = Message::new(draft(), created);
        let later = created + chrono::Duration::seconds(30);

        let mut changed = draft();
        changed.country = None;
        message.apply(changed, later);

        assert_eq!(message.created_date, created);
        assert_eq!(message.modified_date, later);
        assert!(message.country.is_none());
    }
}
