//! ContactStatus - Workflow state of a contact message

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Workflow state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash, ToSchema)]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

impl ContactStatus {
    /// Stored integer representation
    pub fn as_i32(self) -> i32 {
        match self {
            ContactStatus::New => 0,
            ContactStatus::InProgress => 1,
            ContactStatus::Resolved => 2,
            ContactStatus::Closed => 3,
        }
    }
}

impl TryFrom<i32> for ContactStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ContactStatus::New),
            1 => Ok(ContactStatus::InProgress),
            2 => Ok(ContactStatus::Resolved),
            3 => Ok(ContactStatus::Closed),
            _ => Err(format!("Unknown contact status value: {}", value)),
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactStatus::New => write!(f, "New"),
            ContactStatus::InProgress => write!(f, "InProgress"),
            ContactStatus::Resolved => write!(f, "Resolved"),
            ContactStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" | "0" => Ok(ContactStatus::New),
            "inprogress" | "in_progress" | "1" => Ok(ContactStatus::InProgress),
            "resolved" | "2" => Ok(ContactStatus::Resolved),
            "closed" | "3" => Ok(ContactStatus::Closed),
            _ => Err(format!("Unknown contact status: {}", s)),
        }
    }
}
