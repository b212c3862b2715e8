//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories, the upload service and the cache.

mod contact_service;
mod message_service;

pub use contact_service::ContactService;
pub use message_service::MessageService;
