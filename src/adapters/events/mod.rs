//! Event bus adapters.
//!
//! - `EventBus` - Priority-ordered, failure-isolating in-process dispatcher
//! - `ListenerRegistry` - Immutable, validated listener bindings per event type
//! - `DispatchExecutor` - Bounded worker pool for asynchronous listeners
//! - `LoggingErrorHandler` - Default sink for isolated failures

mod error_handler;
mod event_bus;
mod executor;
mod outcome;
mod registry;
mod stats;

pub use error_handler::LoggingErrorHandler;
pub use event_bus::{EventBus, EventBusBuilder};
pub use executor::{
    DispatchExecutor, ExecutorConfig, Invocation, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_POOL_SIZE,
    MAX_QUEUE_CAPACITY, MAX_WORKER_POOL_SIZE,
};
pub use outcome::{DispatchResult, InvocationState, OutcomeReporter};
pub use registry::{
    BindingDescription, ListenerBinding, ListenerRegistry, ListenerRegistryBuilder, Predicate,
    RegistrationError, HIGHEST_PRECEDENCE, LOWEST_PRECEDENCE,
};
pub use stats::{DispatchStats, DispatchStatsSnapshot};
