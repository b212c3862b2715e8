//! MessageSortType - Ordering for message listings

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sort order for paginated message queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema)]
pub enum MessageSortType {
    #[default]
    MessageIdAscending,
    MessageIdDescending,
    MessageCreatedDateAscending,
    MessageCreatedDateDescending,
}

impl std::fmt::Display for MessageSortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSortType::MessageIdAscending => write!(f, "MessageIdAscending"),
            MessageSortType::MessageIdDescending => write!(f, "MessageIdDescending"),
            MessageSortType::MessageCreatedDateAscending => {
                write!(f, "MessageCreatedDateAscending")
            }
            MessageSortType::MessageCreatedDateDescending => {
                write!(f, "MessageCreatedDateDescending")
            }
        }
    }
}

impl std::str::FromStr for MessageSortType {
    type Err = String;

    /// Accepts both `MessageIdDescending` and `MessageId_Descending` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "").to_lowercase().as_str() {
            "messageidascending" | "0" => Ok(MessageSortType::MessageIdAscending),
            "messageiddescending" | "1" => Ok(MessageSortType::MessageIdDescending),
            "messagecreateddateascending" | "2" => Ok(MessageSortType::MessageCreatedDateAscending),
            "messagecreateddatedescending" | "3" => {
                Ok(MessageSortType::MessageCreatedDateDescending)
            }
            _ => Err(format!("Unknown sort type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_underscored_names() {
        assert_eq!(
            "MessageCreatedDate_Descending".parse::<MessageSortType>(),
            Ok(MessageSortType::MessageCreatedDateDescending)
        );
        assert_eq!(
            "messageiddescending".parse::<MessageSortType>(),
            Ok(MessageSortType::MessageIdDescending)
        );
        assert!("newest".parse::<MessageSortType>().is_err());
    }
}
