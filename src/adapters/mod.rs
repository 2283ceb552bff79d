//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to the outside world:
//! - `events` - In-process event bus, listener registry and dispatch executor
//! - `http` - REST endpoints that trigger domain commands

pub mod events;
pub mod http;

pub use events::{EventBus, ListenerBinding, ListenerRegistry};
