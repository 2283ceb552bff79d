//! Order domain events.
//!
//! - `OrderCreated` - A new order was placed

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, Timestamp};

use super::OrderId;

// ════════════════════════════════════════════════════════════════════════════
// OrderCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new order is placed.
///
/// The amount is carried as given; no sign or magnitude validation applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the placed order.
    pub order_id: OrderId,

    /// Order amount.
    pub amount: f64,

    /// When the order was placed.
    pub created_at: Timestamp,
}

impl OrderCreated {
    /// Creates a new event stamped with a fresh ID and the current time.
    pub fn new(order_id: OrderId, amount: f64) -> Self {
        Self {
            event_id: EventId::new(),
            order_id,
            amount,
            created_at: Timestamp::now(),
        }
    }
}

domain_event!(
    OrderCreated,
    event_type = "order.created",
    aggregate_id = order_id,
    occurred_at = created_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainEvent;

    #[test]
    fn order_created_carries_payload() {
        let event = OrderCreated::new(OrderId::new("ORD-1").unwrap(), 500.0);

        assert_eq!(event.event_type(), "order.created");
        assert_eq!(event.aggregate_id(), "ORD-1");
        assert_eq!(event.amount, 500.0);
    }

    #[test]
    fn negative_amounts_are_carried_unchanged() {
        let event = OrderCreated::new(OrderId::new("ORD-R").unwrap(), -42.5);
        assert_eq!(event.amount, -42.5);
    }

    #[test]
    fn each_event_gets_its_own_id() {
        let a = OrderCreated::new(OrderId::new("ORD-1").unwrap(), 1.0);
        let b = OrderCreated::new(OrderId::new("ORD-1").unwrap(), 1.0);
        assert_ne!(a.event_id, b.event_id);
    }
}
