//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - ContactMessage: contact-form submission with its attachments
//! - ContactFile: attachment metadata stored in the upload service
//! - Message: message-service record

mod contact_file;
mod contact_message;
mod message;

pub use contact_file::*;
pub use contact_message::*;
pub use message::*;
