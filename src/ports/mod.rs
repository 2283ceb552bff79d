//! Ports - Interfaces between the order domain and the event machinery.
//!
//! Following hexagonal architecture, ports define the contracts that
//! adapters implement and application services depend on.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventListener` - Listener invoked for a published event
//! - `InvocationContext` / `DispatchMode` - What a listener learns about its invocation
//! - `DispatchErrorHandler` - Sink for isolated listener failures

mod dispatch_error_handler;
mod event_listener;
mod event_publisher;

pub use dispatch_error_handler::{DispatchError, DispatchErrorHandler, ExecutionFailure};
pub use event_listener::{DispatchMode, EventListener, InvocationContext};
pub use event_publisher::EventPublisher;
