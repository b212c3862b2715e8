//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod cache;
pub mod memory;
pub mod postgres;
pub mod upload_client;

// Re-exports
pub use cache::TtlCache;
pub use memory::{InMemoryContactRepository, InMemoryMessageRepository};
pub use postgres::{PgContactRepository, PgMessageRepository};
pub use upload_client::HttpUploadClient;
