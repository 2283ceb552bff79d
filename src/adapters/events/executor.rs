//! Dispatch executor - runs asynchronous listener invocations.
//!
//! ## Architecture
//! ```text
//! submit(Invocation) ──try_send──► [bounded FIFO queue] ──► dispatcher task
//!                                                             │ acquire worker permit
//!                                                             ▼
//!                                                   tokio::spawn(execute(..))
//!                                                             │
//!                                                             ▼
//!                                                   OutcomeReporter::report
//! ```
//!
//! ## Rules
//! - `submit` never waits: a full or closed queue rejects the invocation,
//!   which is reported as `ExecutionFailure::Rejected`.
//! - Invocations start in submission order; at most `worker_pool_size`
//!   run at once. Completion order is not guaranteed.
//! - A failing, panicking or slow invocation affects only its own worker slot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::domain::foundation::DomainError;
use crate::ports::{ExecutionFailure, InvocationContext};

use super::outcome::{execute, DispatchResult, InvocationState, OutcomeReporter};

/// Default number of concurrently running async listeners.
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;

/// Default number of queued, not yet started, async invocations.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Upper bound on concurrently running async listeners.
pub const MAX_WORKER_POOL_SIZE: usize = 256;

/// Upper bound on queued async invocations.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;

/// Executor tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Concurrently running invocations. Clamped to `1..=MAX_WORKER_POOL_SIZE`.
    pub worker_pool_size: usize,

    /// Queued invocations before submissions are rejected. Clamped to
    /// `1..=MAX_QUEUE_CAPACITY`.
    pub queue_capacity: usize,

    /// Upper bound on a single invocation; `None` lets a stuck listener hold
    /// its worker slot indefinitely.
    pub listener_timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            listener_timeout: None,
        }
    }
}

impl ExecutorConfig {
    pub fn with_worker_pool_size(mut self, size: usize) -> Self {
        self.worker_pool_size = size;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_listener_timeout(mut self, timeout: Duration) -> Self {
        self.listener_timeout = Some(timeout);
        self
    }
}

/// One asynchronous listener call waiting to run.
pub struct Invocation {
    ctx: InvocationContext,
    future: BoxFuture<'static, Result<(), DomainError>>,
}

impl Invocation {
    pub fn new(ctx: InvocationContext, future: BoxFuture<'static, Result<(), DomainError>>) -> Self {
        Self { ctx, future }
    }
}

#[derive(Debug, Default)]
struct Occupancy {
    pending: AtomicUsize,
    running: AtomicUsize,
}

/// Worker pool for asynchronous listeners.
///
/// Must be created inside a tokio runtime: the dispatcher task is spawned
/// immediately.
pub struct DispatchExecutor {
    sender: RwLock<Option<mpsc::Sender<Invocation>>>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
    occupancy: Arc<Occupancy>,
    reporter: OutcomeReporter,
    drained: watch::Sender<bool>,
}

impl DispatchExecutor {
    pub fn new(config: ExecutorConfig, reporter: OutcomeReporter) -> Self {
        let workers = config.worker_pool_size.clamp(1, MAX_WORKER_POOL_SIZE);
        let queue_capacity = config.queue_capacity.clamp(1, MAX_QUEUE_CAPACITY);
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let occupancy = Arc::new(Occupancy::default());
        let (drained, _) = watch::channel(false);

        let dispatcher = tokio::spawn(dispatch_loop(
            receiver,
            workers,
            config.listener_timeout,
            reporter.clone(),
            Arc::clone(&occupancy),
        ));

        debug!(
            workers,
            queue_capacity,
            timeout_ms = config.listener_timeout.map(|t| t.as_millis() as u64),
            "Dispatch executor started"
        );

        Self {
            sender: RwLock::new(Some(sender)),
            dispatcher: Mutex::new(Some(dispatcher)),
            occupancy,
            reporter,
            drained,
        }
    }

    /// Queues an invocation without waiting. Rejections are reported, not returned.
    pub fn submit(&self, invocation: Invocation) {
        let guard = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = guard.as_ref() else {
            self.reject(invocation, "executor is shut down");
            return;
        };

        self.occupancy.pending.fetch_add(1, Ordering::SeqCst);
        let listener = invocation.ctx.listener();
        let event_id = invocation.ctx.event_id().clone();
        match sender.try_send(invocation) {
            Ok(()) => trace!(
                listener,
                event_id = %event_id,
                state = %InvocationState::Pending,
                "Invocation queued"
            ),
            Err(mpsc::error::TrySendError::Full(invocation)) => {
                self.occupancy.pending.fetch_sub(1, Ordering::SeqCst);
                self.reject(invocation, "queue full");
            }
            Err(mpsc::error::TrySendError::Closed(invocation)) => {
                self.occupancy.pending.fetch_sub(1, Ordering::SeqCst);
                self.reject(invocation, "executor is shut down");
            }
        }
    }

    fn reject(&self, invocation: Invocation, reason: &str) {
        warn!(
            listener = invocation.ctx.listener(),
            event_type = invocation.ctx.event_type(),
            reason,
            "Async listener submission rejected"
        );
        self.reporter.report(
            &invocation.ctx,
            DispatchResult::Failed(ExecutionFailure::Rejected(reason.to_string())),
        );
    }

    /// Invocations queued but not yet started.
    pub fn pending(&self) -> usize {
        self.occupancy.pending.load(Ordering::SeqCst)
    }

    /// Invocations currently running.
    pub fn running(&self) -> usize {
        self.occupancy.running.load(Ordering::SeqCst)
    }

    /// Stops accepting submissions and waits for queued and running
    /// invocations to finish. Concurrent and repeated calls all return only
    /// once the drain is complete.
    pub async fn shutdown(&self) {
        let sender = self
            .sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);

        let dispatcher = self
            .dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match dispatcher {
            Some(handle) => {
                if let Err(err) = handle.await {
                    warn!(error = %err, "Dispatcher task ended abnormally");
                }
                self.drained.send_replace(true);
                debug!("Dispatch executor drained");
            }
            None => {
                let mut drained = self.drained.subscribe();
                // The sender lives in `self`, so this only ends once drained.
                let _ = drained.wait_for(|done| *done).await;
            }
        }
    }
}

async fn dispatch_loop(
    mut receiver: mpsc::Receiver<Invocation>,
    workers: usize,
    timeout: Option<Duration>,
    reporter: OutcomeReporter,
    occupancy: Arc<Occupancy>,
) {
    let permits = Arc::new(Semaphore::new(workers));

    loop {
        // A free worker is claimed before dequeuing so the queue bound stays exact.
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let Some(invocation) = receiver.recv().await else {
            break;
        };
        occupancy.pending.fetch_sub(1, Ordering::SeqCst);
        occupancy.running.fetch_add(1, Ordering::SeqCst);

        let reporter = reporter.clone();
        let occupancy = Arc::clone(&occupancy);
        tokio::spawn(async move {
            let Invocation { ctx, future } = invocation;
            trace!(
                listener = ctx.listener(),
                event_id = %ctx.event_id(),
                state = %InvocationState::Running,
                "Invocation started"
            );

            let result = execute(future, timeout).await;
            occupancy.running.fetch_sub(1, Ordering::SeqCst);
            reporter.report(&ctx, result);
            drop(permit);
        });
    }

    // Every in-flight invocation holds one permit until it has reported.
    let all = u32::try_from(workers).unwrap_or(u32::MAX);
    let _ = permits.acquire_many(all).await;
}
