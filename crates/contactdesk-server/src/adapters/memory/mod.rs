//! In-memory Repository Implementations

mod contact_repository;
mod message_repository;

pub use contact_repository::InMemoryContactRepository;
pub use message_repository::InMemoryMessageRepository;
