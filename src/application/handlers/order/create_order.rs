//! CreateOrderHandler - Command handler for placing orders.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{DomainError, DomainEvent, ErrorCode, EventId, ValidationError};
use crate::domain::order::{OrderCreated, OrderId};
use crate::ports::EventPublisher;

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub order_id: String,
    pub amount: f64,
}

/// Result of a successfully placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderResult {
    pub order_id: OrderId,
    pub event_id: EventId,
}

/// Errors from placing an order.
///
/// Listener failures never appear here; only the command itself can be rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::Validation(err) => err.code(),
        }
    }
}

impl From<OrderError> for DomainError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(err) => err.into(),
        }
    }
}

/// Handler for placing orders.
pub struct CreateOrderHandler {
    event_publisher: Arc<dyn EventPublisher<OrderCreated>>,
}

impl CreateOrderHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher<OrderCreated>>) -> Self {
        Self { event_publisher }
    }

    /// Validates the order and publishes `OrderCreated`.
    ///
    /// Returns after synchronous listeners have run; asynchronous listeners
    /// may still be in flight.
    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CreateOrderResult, OrderError> {
        let order_id = OrderId::new(cmd.order_id)?;

        info!(order_id = %order_id, amount = cmd.amount, "order is created");

        let event = OrderCreated::new(order_id.clone(), cmd.amount);
        let event_id = event.event_id();

        self.event_publisher.publish(event).await;

        Ok(CreateOrderResult { order_id, event_id })
    }
}
