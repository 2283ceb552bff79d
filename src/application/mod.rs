//! Application layer - Commands, Handlers, and Listeners.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers publish events; listeners react to them through the bus.

pub mod handlers;

pub use handlers::{
    // Order commands
    CreateOrderCommand, CreateOrderHandler, CreateOrderResult, OrderError,
    // Order listeners
    AuditOrderListener, EmailOrderListener, HighValueOrderListener,
    register_order_listeners,
};
