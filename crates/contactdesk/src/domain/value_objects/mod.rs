//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod contact_status;
mod contact_type;
mod message_sort_type;
mod paginated_list;
mod priority;

pub use contact_status::*;
pub use contact_type::*;
pub use message_sort_type::*;
pub use paginated_list::*;
pub use priority::*;
