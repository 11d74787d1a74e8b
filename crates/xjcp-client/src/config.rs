//! Client configuration.

use std::time::Duration;

use crate::error::ClientError;

/// Default keep-alive interval between liveness checks.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(1);

/// Default bound on a single keep-alive ping round trip.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(30);

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`crate::Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server endpoint URL every envelope is POSTed to.
    pub host: String,
    /// Idle threshold beyond which the watchdog pings; strictly positive.
    pub keep_alive_interval: Duration,
    /// Bound on the watchdog's wait for one ping result.
    pub ping_timeout: Duration,
    /// Timeout applied to every HTTP exchange.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `host` with default timing.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            keep_alive_interval: DEFAULT_KEEP_ALIVE,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Replace the keep-alive interval.
    pub fn keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.host.is_empty() {
            return Err(ClientError::Config {
                reason: "host must not be empty".to_string(),
            });
        }
        if self.keep_alive_interval.is_zero() {
            return Err(ClientError::Config {
                reason: "keep-alive interval must be strictly positive".to_string(),
            });
        }
        if self.ping_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(ClientError::Config {
                reason: "timeouts must be strictly positive".to_string(),
            });
        }
        Ok(())
    }
}
