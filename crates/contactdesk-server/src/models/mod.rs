//! Contactdesk Data Models
//!
//! - Contact: contact-form submissions, status updates and listings
//! - Message: message-service records and pages
//! - Health: readiness report

mod contact;
mod health;
mod message;
mod validation;

pub use contact::*;
pub use health::*;
pub use message::*;
