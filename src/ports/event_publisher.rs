//! EventPublisher port - Interface for publishing domain events.
//!
//! This port defines how application services publish events without
//! knowing how listeners are registered or executed.

use async_trait::async_trait;

use crate::domain::foundation::DomainEvent;

/// Port for publishing domain events of type `E`.
///
/// Implementations must ensure:
/// - Publishing never fails because of listener behavior (fire-and-isolate)
/// - Synchronous listeners have completed when `publish` returns
/// - Asynchronous listeners have been handed off, not awaited
///
/// # Example
///
/// ```ignore
/// let event = OrderCreated::new(order_id, 1500.0);
/// publisher.publish(event).await;
/// ```
#[async_trait]
pub trait EventPublisher<E: DomainEvent>: Send + Sync {
    /// Publish a single event to every matching listener.
    async fn publish(&self, event: E);
}
