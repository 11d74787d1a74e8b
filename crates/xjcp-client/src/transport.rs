//! HTTP transport seam.
//!
//! The engine only needs "send this envelope, give me the response body";
//! everything HTTP-specific lives behind [`Transport`] so tests can swap
//! in scripted exchanges.

use std::time::Duration;

use async_trait::async_trait;

/// Transport-level failures, before the response body is interpreted.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {reason}")]
    ClientBuild {
        /// Error description.
        reason: String,
    },
    /// The request did not complete (connection, TLS, timeout).
    #[error("HTTP request failed: {reason}")]
    Http {
        /// Error description.
        reason: String,
    },
    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },
}

/// One request/response exchange with the server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST the JSON-encoded `envelope` and return the raw response body.
    async fn exchange(&self, envelope: &str) -> Result<String, TransportError>;
}

/// Production transport: a single POST per command with one form field
/// `msg` carrying the JSON envelope.
pub struct HttpTransport {
    host: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport for `host` with the given request timeout.
    pub fn new(host: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ClientBuild {
                reason: e.to_string(),
            })?;
        Ok(Self::with_client(host, client))
    }

    /// Build a transport reusing a shared `reqwest` client.
    pub fn with_client(host: &str, client: reqwest::Client) -> Self {
        Self {
            host: host.to_string(),
            client,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, envelope: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.host)
            .form(&[("msg", envelope)])
            .send()
            .await
            .map_err(|e| TransportError::Http {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| TransportError::Http {
            reason: e.to_string(),
        })
    }
}
