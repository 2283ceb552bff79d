//! Default dispatch error handler - logs isolated failures.

use tracing::warn;

use crate::ports::{DispatchError, DispatchErrorHandler};

/// Writes every isolated failure as a structured `warn` line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorHandler;

impl DispatchErrorHandler for LoggingErrorHandler {
    fn handle(&self, error: &DispatchError) {
        match error {
            DispatchError::PredicateEvaluation {
                event_type,
                listener,
                reason,
            } => {
                warn!(
                    event_type,
                    listener,
                    reason = %reason,
                    "Predicate evaluation failed; listener skipped"
                );
            }
            DispatchError::ListenerExecution {
                event_type,
                listener,
                mode,
                failure,
            } => {
                warn!(
                    event_type,
                    listener,
                    mode = %mode,
                    error = %failure,
                    "Error in event listener"
                );
            }
        }
    }
}
