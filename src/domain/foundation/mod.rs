//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, event primitives, and error types
//! that form the vocabulary of the order domain.

mod errors;
mod events;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventId};
pub use timestamp::Timestamp;
