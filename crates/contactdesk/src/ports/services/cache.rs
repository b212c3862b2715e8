//! Contact Cache Port
//!
//! Process-local cache of materialized contact messages.

use std::time::Duration;

use crate::domain::ContactMessage;

/// Key/value cache for contact-message views.
///
/// Calls are synchronous: implementations are in-process and must not block
/// on I/O.
pub trait ContactCache: Send + Sync {
    fn get(&self, key: &str) -> Option<ContactMessage>;

    /// Insert or replace `key`, expiring after `ttl`
    fn set(&self, key: &str, value: ContactMessage, ttl: Duration);

    fn remove(&self, key: &str);
}
