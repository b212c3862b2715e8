//! Contactdesk Domain Library
//!
//! Core domain types and interfaces for the contact intake services.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (ContactMessage, ContactFile, Message)
//!   - `value_objects/`: Immutable value types (ContactType, Priority, ContactStatus,
//!     MessageSortType, PaginatedList)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service and cache interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use contactdesk::domain::{ContactMessage, ContactStatus};
//! use contactdesk::ports::{ContactRepository, UploadClient};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    contact_cache_key, Attachment, ContactFile, ContactMessage, ContactStatus, ContactType,
    DomainError, Message, MessageDraft, MessageSortType, NewContactFile, NewContactMessage,
    PaginatedList, Priority,
};
pub use ports::{
    // Services
    ContactCache,
    // Repositories
    ContactListFilter,
    ContactRepository,
    ContactWriteScope,
    DownloadedFile,
    MessageRepository,
    MessageSearch,
    UploadClient,
    UploadedFile,
};
