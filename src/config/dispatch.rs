//! Event dispatch configuration

use serde::Deserialize;
use std::time::Duration;

pub use crate::adapters::events::{MAX_QUEUE_CAPACITY, MAX_WORKER_POOL_SIZE};

use crate::adapters::events::{ExecutorConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_POOL_SIZE};

use super::error::ValidationError;

/// Dispatch executor configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DispatchConfig {
    /// Async listeners allowed to run at once
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,

    /// Async invocations queued before submissions are rejected
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Per-invocation timeout for async listeners; unset means no limit
    #[serde(default)]
    pub listener_timeout_ms: Option<u64>,
}

impl DispatchConfig {
    /// Executor settings derived from this section
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            worker_pool_size: self.worker_pool_size,
            queue_capacity: self.queue_capacity,
            listener_timeout: self.listener_timeout_ms.map(Duration::from_millis),
        }
    }

    /// Validate dispatch configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.worker_pool_size == 0 || self.worker_pool_size > MAX_WORKER_POOL_SIZE {
            return Err(ValidationError::InvalidWorkerPoolSize {
                actual: self.worker_pool_size,
                max: MAX_WORKER_POOL_SIZE,
            });
        }
        if self.queue_capacity == 0 || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ValidationError::InvalidQueueCapacity {
                actual: self.queue_capacity,
                max: MAX_QUEUE_CAPACITY,
            });
        }
        if self.listener_timeout_ms == Some(0) {
            return Err(ValidationError::InvalidListenerTimeout);
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: default_worker_pool_size(),
            queue_capacity: default_queue_capacity(),
            listener_timeout_ms: None,
        }
    }
}

fn default_worker_pool_size() -> usize {
    DEFAULT_WORKER_POOL_SIZE
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
