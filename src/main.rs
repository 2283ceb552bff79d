//! Order Events server binary.
//!
//! Loads configuration, builds the listener registry and event bus, and
//! serves the order API until interrupted. In-flight async listeners are
//! drained before exit.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use order_events::adapters::events::{EventBus, ListenerRegistry, RegistrationError};
use order_events::adapters::http::{app_router, OrderAppState};
use order_events::application::{register_order_listeners, CreateOrderHandler};
use order_events::config::{AppConfig, ConfigError, ServerConfig, ValidationError};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("Listener registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Tracing initialization failed: {0}")]
    Tracing(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;

    init_tracing(&config.server)?;
    config.validate()?;

    let registry = register_order_listeners(ListenerRegistry::builder(), &config.orders).build()?;
    for binding in registry.describe() {
        info!(binding = %binding, "Listener registered");
    }

    let bus = Arc::new(
        EventBus::builder(registry)
            .with_executor_config(config.dispatch.executor_config())
            .build(),
    );

    let state = OrderAppState {
        create_order: Arc::new(CreateOrderHandler::new(bus.clone())),
    };
    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        workers = config.dispatch.worker_pool_size,
        "Order events server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(in_flight = bus.in_flight(), "Draining async listeners");
    bus.shutdown().await;
    info!(stats = ?bus.stats(), "Order events server stopped");

    Ok(())
}

/// JSON lines in production, human-readable output elsewhere.
fn init_tracing(server: &ServerConfig) -> Result<(), StartupError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .map_err(|e| StartupError::Tracing(e.to_string()))?;

    if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
            .map_err(|e| StartupError::Tracing(e.to_string()))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .map_err(|e| StartupError::Tracing(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
