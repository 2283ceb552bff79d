//! HTTP adapter for order endpoints.
//!
//! - `POST /api/order/create?orderId=<id>&amount=<amount>` - Place an order

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CreateOrderQuery, ErrorResponse};
pub use handlers::{create_order, OrderApiError, OrderAppState};
pub use routes::{order_router, order_routes};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::order::CreateOrderHandler;
    use crate::domain::order::OrderCreated;
    use crate::ports::EventPublisher;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<OrderCreated>>,
    }

    #[async_trait]
    impl EventPublisher<OrderCreated> for RecordingPublisher {
        async fn publish(&self, event: OrderCreated) {
            self.published.lock().unwrap().push(event);
        }
    }

    fn app(publisher: Arc<RecordingPublisher>) -> axum::Router {
        let state = OrderAppState {
            create_order: Arc::new(CreateOrderHandler::new(publisher)),
        };
        order_router().with_state(state)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn create_order_returns_confirmation() {
        let publisher = Arc::new(RecordingPublisher::default());
        let response = app(publisher.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/order/create?orderId=ORD-1&amount=500")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Order placed successfully ORD-1");
        assert_eq!(publisher.published.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_order_id_is_bad_request() {
        let publisher = Arc::new(RecordingPublisher::default());
        let response = app(publisher.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/order/create?orderId=&amount=500")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.code, "EMPTY_FIELD");
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparsable_amount_is_rejected() {
        let publisher = Arc::new(RecordingPublisher::default());
        let response = app(publisher)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/order/create?orderId=ORD-1&amount=lots")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_is_not_allowed() {
        let publisher = Arc::new(RecordingPublisher::default());
        let response = app(publisher)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/order/create?orderId=ORD-1&amount=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
