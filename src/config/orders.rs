//! Order listener configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings for the listeners reacting to placed orders
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OrdersConfig {
    /// Orders strictly above this amount trigger the high value listener
    #[serde(default = "default_high_value_threshold")]
    pub high_value_threshold: f64,

    /// Simulated latency of the email listener
    #[serde(default = "default_email_latency_ms")]
    pub email_latency_ms: u64,

    /// Simulated latency of the audit listener
    #[serde(default)]
    pub audit_latency_ms: u64,
}

impl OrdersConfig {
    pub fn email_latency(&self) -> Duration {
        Duration::from_millis(self.email_latency_ms)
    }

    pub fn audit_latency(&self) -> Duration {
        Duration::from_millis(self.audit_latency_ms)
    }

    /// Validate order listener configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.high_value_threshold.is_finite() {
            return Err(ValidationError::InvalidHighValueThreshold);
        }
        Ok(())
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: default_high_value_threshold(),
            email_latency_ms: default_email_latency_ms(),
            audit_latency_ms: 0,
        }
    }
}

fn default_high_value_threshold() -> f64 {
    1000.0
}

fn default_email_latency_ms() -> u64 {
    1500
}
