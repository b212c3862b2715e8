//! Service Ports
//!
//! Abstract interfaces for external services and caching.

mod cache;
mod upload_client;

pub use cache::*;
pub use upload_client::*;
