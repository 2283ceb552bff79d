//! Axum router configuration for order endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_order, OrderAppState};

/// Order routes, mounted at `/api/order`.
///
/// # Routes
/// - `POST /create` - Place an order and publish `OrderCreated`
pub fn order_routes() -> Router<OrderAppState> {
    Router::new().route("/create", post(create_order))
}

/// Order module router with paths rooted at `/api/order`.
pub fn order_router() -> Router<OrderAppState> {
    Router::new().nest("/api/order", order_routes())
}
