//! DispatchErrorHandler port - Where isolated listener failures go.
//!
//! The bus never propagates a listener failure to the publisher. Instead
//! every failure is described as a [`DispatchError`] and handed to the
//! configured handler, which may log it, count it, or collect it in tests.

use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::DomainError;

use super::DispatchMode;

/// Why a single listener invocation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionFailure {
    /// The listener returned an error.
    #[error("{0}")]
    Returned(DomainError),

    /// The listener panicked; the payload message is kept when it is a string.
    #[error("panicked: {0}")]
    Panicked(String),

    /// The listener exceeded the executor's invocation timeout.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// The executor refused the submission (queue full or shut down).
    #[error("rejected by executor: {0}")]
    Rejected(String),
}

/// An isolated failure observed while dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The binding's predicate failed; the listener was treated as not matching.
    #[error("predicate of listener '{listener}' for '{event_type}' failed: {reason}")]
    PredicateEvaluation {
        event_type: &'static str,
        listener: &'static str,
        reason: String,
    },

    /// The listener itself failed.
    #[error("listener '{listener}' ({mode}) for '{event_type}' failed: {failure}")]
    ListenerExecution {
        event_type: &'static str,
        listener: &'static str,
        mode: DispatchMode,
        failure: ExecutionFailure,
    },
}

impl DispatchError {
    /// Name of the listener whose binding failed.
    pub fn listener(&self) -> &'static str {
        match self {
            DispatchError::PredicateEvaluation { listener, .. } => listener,
            DispatchError::ListenerExecution { listener, .. } => listener,
        }
    }

    /// Event type being dispatched when the failure occurred.
    pub fn event_type(&self) -> &'static str {
        match self {
            DispatchError::PredicateEvaluation { event_type, .. } => event_type,
            DispatchError::ListenerExecution { event_type, .. } => event_type,
        }
    }
}

/// Receives every failure the bus isolates.
///
/// Called from the publisher's task for sync listeners and predicates, and
/// from executor worker tasks for async listeners, so implementations must
/// be cheap and must not panic.
pub trait DispatchErrorHandler: Send + Sync {
    fn handle(&self, error: &DispatchError);
}
