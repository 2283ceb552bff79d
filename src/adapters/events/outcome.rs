//! Per-invocation execution and outcome reporting.
//!
//! Both dispatch paths run a listener through [`execute`], which captures
//! returned errors, panics and (optionally) timeouts as a [`DispatchResult`].
//! [`OutcomeReporter`] turns results into statistics, log lines and calls
//! to the configured [`DispatchErrorHandler`].

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, trace};

use crate::domain::foundation::DomainError;
use crate::ports::{DispatchError, DispatchErrorHandler, ExecutionFailure, InvocationContext};

use super::stats::DispatchStats;

/// Lifecycle of one listener invocation.
///
/// `Pending -> Running -> {Completed | Failed}`; there are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvocationState::Pending => "pending",
            InvocationState::Running => "running",
            InvocationState::Completed => "completed",
            InvocationState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Terminal outcome of one invocation. Never returned to the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Completed,
    Failed(ExecutionFailure),
}

impl DispatchResult {
    pub fn state(&self) -> InvocationState {
        match self {
            DispatchResult::Completed => InvocationState::Completed,
            DispatchResult::Failed(_) => InvocationState::Failed,
        }
    }
}

/// Runs a listener future to completion, capturing every failure mode.
pub async fn execute<F>(invocation: F, timeout: Option<Duration>) -> DispatchResult
where
    F: Future<Output = Result<(), DomainError>>,
{
    let guarded = AssertUnwindSafe(invocation).catch_unwind();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_) => return DispatchResult::Failed(ExecutionFailure::TimedOut(limit)),
        },
        None => guarded.await,
    };

    match outcome {
        Ok(Ok(())) => DispatchResult::Completed,
        Ok(Err(err)) => DispatchResult::Failed(ExecutionFailure::Returned(err)),
        Err(payload) => DispatchResult::Failed(ExecutionFailure::Panicked(panic_message(
            payload.as_ref(),
        ))),
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Shared sink for invocation outcomes.
#[derive(Clone)]
pub struct OutcomeReporter {
    stats: Arc<DispatchStats>,
    error_handler: Arc<dyn DispatchErrorHandler>,
}

impl OutcomeReporter {
    pub fn new(stats: Arc<DispatchStats>, error_handler: Arc<dyn DispatchErrorHandler>) -> Self {
        Self {
            stats,
            error_handler,
        }
    }

    /// Records the terminal state of an invocation.
    pub fn report(&self, ctx: &InvocationContext, result: DispatchResult) {
        trace!(
            listener = ctx.listener(),
            event_id = %ctx.event_id(),
            state = %result.state(),
            "Invocation finished"
        );

        match result {
            DispatchResult::Completed => {
                self.stats.record_completed();
                debug!(
                    event_type = ctx.event_type(),
                    listener = ctx.listener(),
                    mode = %ctx.mode(),
                    "Listener completed"
                );
            }
            DispatchResult::Failed(failure) => {
                if matches!(failure, ExecutionFailure::Rejected(_)) {
                    self.stats.record_rejected();
                } else {
                    self.stats.record_failed();
                }
                self.error_handler.handle(&DispatchError::ListenerExecution {
                    event_type: ctx.event_type(),
                    listener: ctx.listener(),
                    mode: ctx.mode(),
                    failure,
                });
            }
        }
    }

    /// Records a binding whose predicate did not match.
    pub fn skipped(&self, ctx: &InvocationContext) {
        self.stats.record_skipped();
        trace!(
            event_type = ctx.event_type(),
            listener = ctx.listener(),
            "Predicate did not match; listener skipped"
        );
    }

    /// Records a predicate that failed to evaluate (treated as non-match).
    pub fn predicate_failed(&self, ctx: &InvocationContext, reason: String) {
        self.stats.record_predicate_error();
        self.error_handler.handle(&DispatchError::PredicateEvaluation {
            event_type: ctx.event_type(),
            listener: ctx.listener(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting(Mutex<Vec<DispatchError>>);

    impl DispatchErrorHandler for Collecting {
        fn handle(&self, error: &DispatchError) {
            self.0.lock().unwrap().push(error.clone());
        }
    }

    fn ctx() -> InvocationContext {
        use crate::domain::order::{OrderCreated, OrderId};
        use crate::ports::DispatchMode;

        let event = OrderCreated::new(OrderId::new("ORD-1").unwrap(), 1.0);
        InvocationContext::new(&event, "probe", 1, DispatchMode::Async)
    }

    #[tokio::test]
    async fn ok_future_completes() {
        let result = execute(async { Ok(()) }, None).await;
        assert_eq!(result, DispatchResult::Completed);
        assert_eq!(result.state(), InvocationState::Completed);
    }

    #[tokio::test]
    async fn returned_error_is_captured() {
        let result = execute(
            async { Err(DomainError::new(ErrorCode::ListenerFailed, "nope")) },
            None,
        )
        .await;

        assert!(matches!(
            result,
            DispatchResult::Failed(ExecutionFailure::Returned(ref e)) if e.message == "nope"
        ));
        assert_eq!(result.state(), InvocationState::Failed);
    }

    #[tokio::test]
    async fn panic_is_captured() {
        let result = execute(
            async {
                if true {
                    panic!("listener blew up");
                }
                Ok(())
            },
            None,
        )
        .await;

        assert_eq!(
            result,
            DispatchResult::Failed(ExecutionFailure::Panicked("listener blew up".to_string()))
        );
    }

    #[tokio::test]
    async fn timeout_is_enforced() {
        let limit = Duration::from_millis(20);
        let result = execute(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
            Some(limit),
        )
        .await;

        assert_eq!(result, DispatchResult::Failed(ExecutionFailure::TimedOut(limit)));
    }

    #[test]
    fn reporter_routes_failures_to_handler() {
        let handler = Arc::new(Collecting::default());
        let stats = Arc::new(DispatchStats::default());
        let reporter = OutcomeReporter::new(stats.clone(), handler.clone());

        reporter.report(&ctx(), DispatchResult::Completed);
        reporter.report(
            &ctx(),
            DispatchResult::Failed(ExecutionFailure::Panicked("x".to_string())),
        );
        reporter.report(
            &ctx(),
            DispatchResult::Failed(ExecutionFailure::Rejected("queue full".to_string())),
        );
        reporter.predicate_failed(&ctx(), "bad".to_string());
        reporter.skipped(&ctx());

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.listeners_completed, 1);
        assert_eq!(snapshot.listeners_failed, 1);
        assert_eq!(snapshot.submissions_rejected, 1);
        assert_eq!(snapshot.predicate_errors, 1);
        assert_eq!(snapshot.listeners_skipped, 1);
        assert_eq!(handler.0.lock().unwrap().len(), 3);
    }
}
