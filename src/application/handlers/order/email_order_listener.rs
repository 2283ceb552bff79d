//! EmailOrderListener - Sends the order confirmation email.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::order::OrderCreated;
use crate::ports::{EventListener, InvocationContext};

/// Slow by nature, so it is registered as an async listener and never
/// holds up the order request.
#[derive(Debug, Clone)]
pub struct EmailOrderListener {
    latency: Duration,
}

impl EmailOrderListener {
    pub const NAME: &'static str = "email-order";

    /// `latency` stands in for the mail provider round trip.
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl EventListener<OrderCreated> for EmailOrderListener {
    async fn on_event(
        &self,
        event: &OrderCreated,
        ctx: &InvocationContext,
    ) -> Result<(), DomainError> {
        tokio::time::sleep(self.latency).await;

        info!(
            order_id = %event.order_id,
            amount = event.amount,
            event_id = %ctx.event_id(),
            "Sending email for Order {} with price {}",
            event.order_id,
            event.amount
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
