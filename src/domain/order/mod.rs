//! Order module - Order identifiers and lifecycle events.

mod events;
mod order_id;

pub use events::OrderCreated;
pub use order_id::OrderId;
