//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.
//! [`app_router`] assembles them with the shared middleware stack.

pub mod order;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use order::{order_router, OrderAppState};

/// Full application router with request tracing and a request timeout.
pub fn app_router(state: OrderAppState, request_timeout: Duration) -> Router {
    order_router()
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
