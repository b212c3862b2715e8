//! PostgreSQL Repository Implementations

mod contact_repository;
mod message_repository;

pub use contact_repository::PgContactRepository;
pub use message_repository::PgMessageRepository;
