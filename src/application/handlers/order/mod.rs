//! Order handlers and listeners.

mod audit_order_listener;
mod create_order;
mod email_order_listener;
mod high_value_order_listener;
mod registration;

pub use audit_order_listener::AuditOrderListener;
pub use create_order::{CreateOrderCommand, CreateOrderHandler, CreateOrderResult, OrderError};
pub use email_order_listener::EmailOrderListener;
pub use high_value_order_listener::HighValueOrderListener;
pub use registration::{
    register_order_listeners, AUDIT_PRIORITY, EMAIL_PRIORITY, HIGH_VALUE_PRIORITY,
};
