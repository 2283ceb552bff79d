//! HighValueOrderListener - Flags orders above the high value threshold.
//!
//! Processing always fails after the order is flagged. The failure is
//! reported through the bus's error handler and never reaches the caller
//! placing the order.

use async_trait::async_trait;
use tracing::warn;

use crate::adapters::events::Predicate;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::order::OrderCreated;
use crate::ports::{EventListener, InvocationContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct HighValueOrderListener;

impl HighValueOrderListener {
    pub const NAME: &'static str = "high-value-order";

    /// Matches orders with `amount > threshold`. NaN amounts never match.
    pub fn predicate(threshold: f64) -> Predicate<OrderCreated> {
        Predicate::new("amount > high_value_threshold", move |event: &OrderCreated| {
            event.amount > threshold
        })
    }
}

#[async_trait]
impl EventListener<OrderCreated> for HighValueOrderListener {
    async fn on_event(
        &self,
        event: &OrderCreated,
        _ctx: &InvocationContext,
    ) -> Result<(), DomainError> {
        warn!(
            order_id = %event.order_id,
            amount = event.amount,
            "High value order detected"
        );

        Err(DomainError::new(
            ErrorCode::ListenerFailed,
            format!("High value order {} could not be processed", event.order_id),
        )
        .with_detail("order_id", event.order_id.as_str()))
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
