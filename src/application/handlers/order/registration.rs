//! Wiring of the order listeners into a listener registry.

use std::sync::Arc;

use crate::adapters::events::{ListenerBinding, ListenerRegistryBuilder, LOWEST_PRECEDENCE};
use crate::config::OrdersConfig;
use crate::domain::order::OrderCreated;

use super::{AuditOrderListener, EmailOrderListener, HighValueOrderListener};

/// Audit runs first and inline.
pub const AUDIT_PRIORITY: i32 = 1;

/// Email is submitted after audit has finished.
pub const EMAIL_PRIORITY: i32 = 2;

/// High value review runs after every other order listener.
pub const HIGH_VALUE_PRIORITY: i32 = LOWEST_PRECEDENCE;

/// Registers the audit, email and high value listeners for `OrderCreated`.
pub fn register_order_listeners(
    builder: ListenerRegistryBuilder,
    config: &OrdersConfig,
) -> ListenerRegistryBuilder {
    builder
        .register(
            ListenerBinding::<OrderCreated>::sync(Arc::new(AuditOrderListener::new(
                config.audit_latency(),
            )))
            .with_priority(AUDIT_PRIORITY),
        )
        .register(
            ListenerBinding::<OrderCreated>::asynchronous(Arc::new(EmailOrderListener::new(
                config.email_latency(),
            )))
            .with_priority(EMAIL_PRIORITY),
        )
        .register(
            ListenerBinding::<OrderCreated>::sync(Arc::new(HighValueOrderListener))
                .with_priority(HIGH_VALUE_PRIORITY)
                .with_predicate(HighValueOrderListener::predicate(
                    config.high_value_threshold,
                )),
        )
}
