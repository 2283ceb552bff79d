//! AuditOrderListener - Records every placed order in the audit log.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::order::OrderCreated;
use crate::ports::{EventListener, InvocationContext};

/// Runs synchronously so the audit line is written before the order
/// request completes.
#[derive(Debug, Clone, Default)]
pub struct AuditOrderListener {
    latency: Duration,
}

impl AuditOrderListener {
    pub const NAME: &'static str = "audit-order";

    /// `latency` simulates a slow audit store; zero disables it.
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl EventListener<OrderCreated> for AuditOrderListener {
    async fn on_event(
        &self,
        event: &OrderCreated,
        ctx: &InvocationContext,
    ) -> Result<(), DomainError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        info!(
            order_id = %event.order_id,
            event_id = %ctx.event_id(),
            "Order is placed successfully for Id {}",
            event.order_id
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
