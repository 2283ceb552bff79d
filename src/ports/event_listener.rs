//! EventListener port - Interface for reacting to published events.
//!
//! Listeners register interest in one event type through the listener
//! registry and are invoked by the bus with a read-only view of the event
//! and an [`InvocationContext`] describing the invocation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, DomainEvent, EventId, Timestamp};

/// How the bus runs a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Awaited inline by the publisher, strictly one after another.
    Sync,
    /// Handed to the dispatch executor; the publisher does not wait.
    Async,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Sync => write!(f, "sync"),
            DispatchMode::Async => write!(f, "async"),
        }
    }
}

/// Read-only description of one listener invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    event_id: EventId,
    event_type: &'static str,
    listener: &'static str,
    priority: i32,
    mode: DispatchMode,
    dispatched_at: Timestamp,
}

impl InvocationContext {
    /// Builds the context for invoking `listener` with `event`.
    pub fn new<E: DomainEvent>(
        event: &E,
        listener: &'static str,
        priority: i32,
        mode: DispatchMode,
    ) -> Self {
        Self {
            event_id: event.event_id(),
            event_type: event.event_type(),
            listener,
            priority,
            mode,
            dispatched_at: Timestamp::now(),
        }
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn event_type(&self) -> &'static str {
        self.event_type
    }

    pub fn listener(&self) -> &'static str {
        self.listener
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// When the bus started dispatching to this listener.
    pub fn dispatched_at(&self) -> Timestamp {
        self.dispatched_at
    }
}

/// Listener for events of type `E`.
///
/// Implementations should be:
/// - **Side-effect only** - The event is shared and must not be mutated
/// - **Self-contained** - Errors are returned, never relied on to stop dispatch
///
/// A returned error or a panic is captured by the bus, reported to the
/// dispatch error handler, and never reaches the publisher or sibling
/// listeners.
///
/// # Example
///
/// ```ignore
/// struct AuditOrderListener;
///
/// #[async_trait]
/// impl EventListener<OrderCreated> for AuditOrderListener {
///     async fn on_event(&self, event: &OrderCreated, _: &InvocationContext) -> Result<(), DomainError> {
///         tracing::info!(order_id = %event.order_id, "Order audited");
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "AuditOrderListener"
///     }
/// }
/// ```
#[async_trait]
pub trait EventListener<E: DomainEvent>: Send + Sync {
    /// Reacts to one published event.
    async fn on_event(&self, event: &E, ctx: &InvocationContext) -> Result<(), DomainError>;

    /// Listener name for logging, statistics and duplicate detection.
    fn name(&self) -> &'static str;
}
