//! HTTP handlers for order endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::application::handlers::order::{CreateOrderCommand, CreateOrderHandler, OrderError};

use super::dto::{CreateOrderQuery, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for order routes.
#[derive(Clone)]
pub struct OrderAppState {
    pub create_order: Arc<CreateOrderHandler>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /api/order/create?orderId=<id>&amount=<amount>`
///
/// Responds once synchronous listeners have run. Listener failures never
/// change the response.
pub async fn create_order(
    State(state): State<OrderAppState>,
    Query(query): Query<CreateOrderQuery>,
) -> Result<String, OrderApiError> {
    let result = state
        .create_order
        .handle(CreateOrderCommand {
            order_id: query.order_id,
            amount: query.amount,
        })
        .await?;

    Ok(format!("Order placed successfully {}", result.order_id))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

/// Maps application errors onto HTTP responses.
#[derive(Debug)]
pub struct OrderApiError(OrderError);

impl From<OrderError> for OrderApiError {
    fn from(err: OrderError) -> Self {
        Self(err)
    }
}

impl IntoResponse for OrderApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            OrderError::Validation(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorResponse::new(self.0.code().to_string(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}
