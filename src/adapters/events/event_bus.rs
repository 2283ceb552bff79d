//! In-process event bus.
//!
//! Dispatches each published event to the bindings registered for its
//! concrete type, in ascending priority order:
//!
//! - Sync bindings are awaited inline, one after another, before `publish` returns.
//! - Async bindings are handed to the [`DispatchExecutor`]; `publish` does not wait.
//! - Predicates are evaluated just before their binding would run.
//!
//! No listener outcome reaches the publisher. Failures, panics, timeouts
//! and rejected submissions go to the configured [`DispatchErrorHandler`].
//!
//! # Example
//!
//! ```ignore
//! let registry = ListenerRegistry::builder()
//!     .register(ListenerBinding::sync(audit).with_priority(1))
//!     .register(ListenerBinding::asynchronous(email).with_priority(2))
//!     .build()?;
//!
//! let bus = EventBus::new(registry);
//! bus.publish(OrderCreated::new(order_id, 500.0)).await;
//! bus.shutdown().await;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, trace};

use crate::domain::foundation::DomainEvent;
use crate::ports::{DispatchErrorHandler, DispatchMode, EventPublisher, InvocationContext};

use super::error_handler::LoggingErrorHandler;
use super::executor::{DispatchExecutor, ExecutorConfig, Invocation};
use super::outcome::{execute, OutcomeReporter};
use super::registry::ListenerRegistry;
use super::stats::{DispatchStats, DispatchStatsSnapshot};

// ════════════════════════════════════════════════════════════════════════════
// Builder
// ════════════════════════════════════════════════════════════════════════════

/// Configures an [`EventBus`] before it starts its executor.
pub struct EventBusBuilder {
    registry: Arc<ListenerRegistry>,
    executor_config: ExecutorConfig,
    error_handler: Arc<dyn DispatchErrorHandler>,
}

impl EventBusBuilder {
    pub fn with_executor_config(mut self, config: ExecutorConfig) -> Self {
        self.executor_config = config;
        self
    }

    pub fn with_error_handler(mut self, handler: Arc<dyn DispatchErrorHandler>) -> Self {
        self.error_handler = handler;
        self
    }

    /// Starts the executor. Must be called inside a tokio runtime.
    pub fn build(self) -> EventBus {
        let stats = Arc::new(DispatchStats::default());
        let reporter = OutcomeReporter::new(Arc::clone(&stats), self.error_handler);
        let executor = DispatchExecutor::new(self.executor_config, reporter.clone());

        EventBus {
            registry: self.registry,
            executor,
            reporter,
            stats,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EventBus
// ════════════════════════════════════════════════════════════════════════════

/// Priority-ordered, failure-isolating event dispatcher.
pub struct EventBus {
    registry: Arc<ListenerRegistry>,
    executor: DispatchExecutor,
    reporter: OutcomeReporter,
    stats: Arc<DispatchStats>,
}

impl EventBus {
    /// Bus with the default executor and the logging error handler.
    pub fn new(registry: ListenerRegistry) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder(registry: ListenerRegistry) -> EventBusBuilder {
        EventBusBuilder {
            registry: Arc::new(registry),
            executor_config: ExecutorConfig::default(),
            error_handler: Arc::new(LoggingErrorHandler),
        }
    }

    /// Dispatches `event` to every matching binding.
    ///
    /// Returns once sync listeners have finished and async listeners have
    /// been submitted. Never fails because of listener behavior.
    pub async fn publish<E: DomainEvent>(&self, event: E) {
        self.stats.record_published();

        let bindings = self.registry.lookup::<E>();
        if bindings.is_empty() {
            debug!(
                event_type = event.event_type(),
                event_id = %event.event_id(),
                "No listeners registered for event"
            );
            return;
        }

        trace!(
            event_type = event.event_type(),
            event_id = %event.event_id(),
            listeners = bindings.len(),
            "Dispatching event"
        );

        let event = Arc::new(event);

        for binding in bindings {
            let ctx = InvocationContext::new(
                event.as_ref(),
                binding.name(),
                binding.priority(),
                binding.mode(),
            );

            match binding.matches(event.as_ref()) {
                Ok(true) => {}
                Ok(false) => {
                    self.reporter.skipped(&ctx);
                    continue;
                }
                Err(reason) => {
                    self.reporter.predicate_failed(&ctx, reason);
                    continue;
                }
            }

            match binding.mode() {
                DispatchMode::Sync => {
                    let result =
                        execute(binding.listener().on_event(event.as_ref(), &ctx), None).await;
                    self.reporter.report(&ctx, result);
                }
                DispatchMode::Async => {
                    let listener = Arc::clone(binding.listener());
                    let event = Arc::clone(&event);
                    let call_ctx = ctx.clone();
                    let future =
                        async move { listener.on_event(event.as_ref(), &call_ctx).await }.boxed();
                    self.executor.submit(Invocation::new(ctx, future));
                }
            }
        }
    }

    /// Counters since the bus was built.
    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }

    /// Async invocations queued or running.
    pub fn in_flight(&self) -> usize {
        self.executor.pending() + self.executor.running()
    }

    /// Stops accepting async work and waits for in-flight listeners.
    ///
    /// Publishing after shutdown still runs sync listeners; async
    /// submissions are rejected.
    pub async fn shutdown(&self) {
        self.executor.shutdown().await;
    }
}

#[async_trait]
impl<E: DomainEvent> EventPublisher<E> for EventBus {
    async fn publish(&self, event: E) {
        EventBus::publish(self, event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::registry::{ListenerBinding, LOWEST_PRECEDENCE};
    use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp};
    use crate::domain::order::{OrderCreated, OrderId};
    use crate::ports::{DispatchError, EventListener, ExecutionFailure};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    // ════════════════════════════════════════════════════════════════════════
    // Test listeners
    // ════════════════════════════════════════════════════════════════════════

    type Log = Arc<Mutex<Vec<String>>>;

    enum Behavior {
        Succeed,
        Fail,
        Panic,
        Sleep(Duration),
    }

    struct Recording {
        name: &'static str,
        log: Log,
        behavior: Behavior,
    }

    impl Recording {
        fn new(name: &'static str, log: &Log) -> Arc<dyn EventListener<OrderCreated>> {
            Self::with(name, log, Behavior::Succeed)
        }

        fn with(
            name: &'static str,
            log: &Log,
            behavior: Behavior,
        ) -> Arc<dyn EventListener<OrderCreated>> {
            Arc::new(Self {
                name,
                log: log.clone(),
                behavior,
            })
        }
    }

    #[async_trait]
    impl EventListener<OrderCreated> for Recording {
        async fn on_event(
            &self,
            event: &OrderCreated,
            _ctx: &InvocationContext,
        ) -> Result<(), DomainError> {
            if let Behavior::Sleep(d) = self.behavior {
                tokio::time::sleep(d).await;
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event.order_id));
            match self.behavior {
                Behavior::Fail => Err(DomainError::new(ErrorCode::ListenerFailed, "failed")),
                Behavior::Panic => panic!("listener panicked"),
                _ => Ok(()),
            }
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    #[derive(Default)]
    struct Collecting(Mutex<Vec<DispatchError>>);

    impl DispatchErrorHandler for Collecting {
        fn handle(&self, error: &DispatchError) {
            self.0.lock().unwrap().push(error.clone());
        }
    }

    fn order(id: &str, amount: f64) -> OrderCreated {
        OrderCreated::new(OrderId::new(id).unwrap(), amount)
    }

    fn log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Ordering
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn sync_listeners_run_in_priority_order_before_publish_returns() {
        let log = log();
        let registry = ListenerRegistry::builder()
            .register(ListenerBinding::sync(Recording::new("c", &log)).with_priority(30))
            .register(ListenerBinding::sync(Recording::new("a", &log)).with_priority(10))
            .register(ListenerBinding::sync(Recording::new("b", &log)).with_priority(20))
            .build()
            .unwrap();
        let bus = EventBus::new(registry);

        bus.publish(order("ORD-1", 10.0)).await;

        assert_eq!(entries(&log), vec!["a:ORD-1", "b:ORD-1", "c:ORD-1"]);
        assert_eq!(bus.stats().listeners_completed, 3);
    }

    #[tokio::test]
    async fn equal_priorities_keep_registration_order() {
        let log = log();
        let registry = ListenerRegistry::builder()
            .register(ListenerBinding::sync(Recording::new("first", &log)).with_priority(5))
            .register(ListenerBinding::sync(Recording::new("second", &log)).with_priority(5))
            .register(ListenerBinding::sync(Recording::new("third", &log)).with_priority(5))
            .build()
            .unwrap();
        let bus = EventBus::new(registry);

        for _ in 0..5 {
            log.lock().unwrap().clear();
            bus.publish(order("ORD-1", 1.0)).await;
            assert_eq!(
                entries(&log),
                vec!["first:ORD-1", "second:ORD-1", "third:ORD-1"]
            );
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Predicates
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn predicate_false_skips_listener() {
        let log = log();
        let registry = ListenerRegistry::builder()
            .register(
                ListenerBinding::sync(Recording::new("high", &log))
                    .when("amount > 1000", |e: &OrderCreated| e.amount > 1000.0),
            )
            .build()
            .unwrap();
        let bus = EventBus::new(registry);

        bus.publish(order("ORD-1", 500.0)).await;
        bus.publish(order("ORD-2", 1500.0)).await;

        assert_eq!(entries(&log), vec!["high:ORD-2"]);
        assert_eq!(bus.stats().listeners_skipped, 1);
    }

    #[tokio::test]
    async fn failing_predicate_is_reported_and_dispatch_continues() {
        let log = log();
        let handler = Arc::new(Collecting::default());
        let registry = ListenerRegistry::builder()
            .register(
                ListenerBinding::sync(Recording::new("guarded", &log))
                    .with_priority(1)
                    .when("explodes", |_: &OrderCreated| -> bool { panic!("bad predicate") }),
            )
            .register(ListenerBinding::sync(Recording::new("after", &log)).with_priority(2))
            .build()
            .unwrap();
        let bus = EventBus::builder(registry)
            .with_error_handler(handler.clone())
            .build();

        bus.publish(order("ORD-1", 1.0)).await;

        assert_eq!(entries(&log), vec!["after:ORD-1"]);
        let errors = handler.0.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            DispatchError::PredicateEvaluation { listener: "guarded", .. }
        ));
        assert_eq!(bus.stats().predicate_errors, 1);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Failure isolation
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn sync_failure_and_panic_do_not_stop_later_listeners() {
        let log = log();
        let handler = Arc::new(Collecting::default());
        let registry = ListenerRegistry::builder()
            .register(
                ListenerBinding::sync(Recording::with("fails", &log, Behavior::Fail))
                    .with_priority(1),
            )
            .register(
                ListenerBinding::sync(Recording::with("panics", &log, Behavior::Panic))
                    .with_priority(2),
            )
            .register(ListenerBinding::sync(Recording::new("survivor", &log)).with_priority(3))
            .build()
            .unwrap();
        let bus = EventBus::builder(registry)
            .with_error_handler(handler.clone())
            .build();

        bus.publish(order("ORD-1", 1.0)).await;

        assert_eq!(
            entries(&log),
            vec!["fails:ORD-1", "panics:ORD-1", "survivor:ORD-1"]
        );
        let errors = handler.0.lock().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[1],
            DispatchError::ListenerExecution {
                failure: ExecutionFailure::Panicked(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn async_failure_is_isolated() {
        let log = log();
        let handler = Arc::new(Collecting::default());
        let registry = ListenerRegistry::builder()
            .register(
                ListenerBinding::asynchronous(Recording::with("async-fail", &log, Behavior::Fail))
                    .with_priority(1),
            )
            .register(ListenerBinding::asynchronous(Recording::new("async-ok", &log)).with_priority(2))
            .build()
            .unwrap();
        let bus = EventBus::builder(registry)
            .with_error_handler(handler.clone())
            .build();

        bus.publish(order("ORD-1", 1.0)).await;
        bus.shutdown().await;

        let mut seen = entries(&log);
        seen.sort();
        assert_eq!(seen, vec!["async-fail:ORD-1", "async-ok:ORD-1"]);
        assert_eq!(handler.0.lock().unwrap().len(), 1);
        let stats = bus.stats();
        assert_eq!(stats.listeners_completed, 1);
        assert_eq!(stats.listeners_failed, 1);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Async dispatch
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn async_listener_does_not_block_publish() {
        let log = log();
        let registry = ListenerRegistry::builder()
            .register(
                ListenerBinding::asynchronous(Recording::with(
                    "slow",
                    &log,
                    Behavior::Sleep(Duration::from_millis(300)),
                ))
                .with_priority(2),
            )
            .register(ListenerBinding::sync(Recording::new("audit", &log)).with_priority(1))
            .build()
            .unwrap();
        let bus = EventBus::new(registry);

        let started = Instant::now();
        bus.publish(order("ORD-1", 500.0)).await;

        assert!(started.elapsed() < Duration::from_millis(300));
        assert_eq!(entries(&log), vec!["audit:ORD-1"]);

        bus.shutdown().await;
        assert_eq!(entries(&log), vec!["audit:ORD-1", "slow:ORD-1"]);
    }

    #[tokio::test]
    async fn publish_after_shutdown_rejects_async_but_runs_sync() {
        let log = log();
        let handler = Arc::new(Collecting::default());
        let registry = ListenerRegistry::builder()
            .register(ListenerBinding::sync(Recording::new("sync", &log)))
            .register(ListenerBinding::asynchronous(Recording::new("async", &log)))
            .build()
            .unwrap();
        let bus = EventBus::builder(registry)
            .with_error_handler(handler.clone())
            .build();

        bus.shutdown().await;
        bus.publish(order("ORD-1", 1.0)).await;

        assert_eq!(entries(&log), vec!["sync:ORD-1"]);
        assert_eq!(bus.stats().submissions_rejected, 1);
        assert!(matches!(
            &handler.0.lock().unwrap()[0],
            DispatchError::ListenerExecution {
                failure: ExecutionFailure::Rejected(_),
                ..
            }
        ));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Edge cases
    // ════════════════════════════════════════════════════════════════════════

    #[derive(Debug)]
    struct Unrelated {
        event_id: EventId,
        key: String,
        at: Timestamp,
    }

    crate::domain_event!(
        Unrelated,
        event_type = "test.unrelated",
        aggregate_id = key,
        occurred_at = at,
        event_id = event_id
    );

    #[tokio::test]
    async fn event_without_listeners_is_a_no_op() {
        let log = log();
        let registry = ListenerRegistry::builder()
            .register(ListenerBinding::sync(Recording::new("orders-only", &log)))
            .build()
            .unwrap();
        let bus = EventBus::new(registry);

        bus.publish(Unrelated {
            event_id: EventId::new(),
            key: "k".to_string(),
            at: Timestamp::now(),
        })
        .await;

        assert!(entries(&log).is_empty());
        assert_eq!(bus.stats().events_published, 1);
        assert_eq!(bus.stats().listeners_completed, 0);
    }

    #[tokio::test]
    async fn usable_through_publisher_port() {
        let log = log();
        let registry = ListenerRegistry::builder()
            .register(ListenerBinding::sync(Recording::new("port", &log)).with_priority(LOWEST_PRECEDENCE))
            .build()
            .unwrap();
        let publisher: Arc<dyn EventPublisher<OrderCreated>> = Arc::new(EventBus::new(registry));

        publisher.publish(order("ORD-9", 1.0)).await;

        assert_eq!(entries(&log), vec!["port:ORD-9"]);
    }
}
