//! Application handlers.
//!
//! Command handlers and event listeners that orchestrate domain operations.

pub mod order;

pub use order::{
    register_order_listeners, AuditOrderListener, CreateOrderCommand, CreateOrderHandler,
    CreateOrderResult, EmailOrderListener, HighValueOrderListener, OrderError,
};
