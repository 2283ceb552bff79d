//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, event trait, timestamps)
//! - `order` - Order identifiers and order events

pub mod foundation;
pub mod order;
