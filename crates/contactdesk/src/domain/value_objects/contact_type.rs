//! ContactType - Classification of an incoming contact request

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What the requester is contacting us about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash, ToSchema)]
pub enum ContactType {
    #[default]
    General,
    Supplier,
    Quotation,
    Business,
}

impl ContactType {
    /// Stored integer representation
    pub fn as_i32(self) -> i32 {
        match self {
            ContactType::General => 0,
            ContactType::Supplier => 1,
            ContactType::Quotation => 2,
            ContactType::Business => 3,
        }
    }
}

impl TryFrom<i32> for ContactType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ContactType::General),
            1 => Ok(ContactType::Supplier),
            2 => Ok(ContactType::Quotation),
            3 => Ok(ContactType::Business),
            _ => Err(format!("Unknown contact type value: {}", value)),
        }
    }
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactType::General => write!(f, "General"),
            ContactType::Supplier => write!(f, "Supplier"),
            ContactType::Quotation => write!(f, "Quotation"),
            ContactType::Business => write!(f, "Business"),
        }
    }
}

impl std::str::FromStr for ContactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" | "0" => Ok(ContactType::General),
            "supplier" | "1" => Ok(ContactType::Supplier),
            "quotation" | "2" => Ok(ContactType::Quotation),
            "business" | "3" => Ok(ContactType::Business),
            _ => Err(format!("Unknown contact type: {}", s)),
        }
    }
}
