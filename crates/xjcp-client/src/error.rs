//! Client-side error taxonomy.
//!
//! A failed command surfaces exactly one of these through its deferred
//! result; the dispatcher itself never stops on a per-command failure.

use std::time::Duration;

use xjcp_core::error::EnvelopeError;

use crate::transport::TransportError;

/// Errors surfaced through a deferred result or a configuration call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP exchange failed before a response body was obtained.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be decoded as an envelope.
    #[error("decode: {0}")]
    Envelope(#[from] EnvelopeError),

    /// A result field was present but did not have the expected shape.
    #[error("unexpected payload in {field}: {reason}")]
    UnexpectedPayload {
        /// The response member that failed to decode.
        field: &'static str,
        /// Decoder error description.
        reason: String,
    },

    /// The client is shut down; no further commands are accepted.
    #[error("client is shut down")]
    Closed,

    /// A bounded wait on a deferred result elapsed.
    #[error("no result within {timeout:?}")]
    Timeout {
        /// The wait bound that elapsed.
        timeout: Duration,
    },

    /// The client configuration is invalid.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What was rejected.
        reason: String,
    },
}

impl ClientError {
    pub(crate) fn unexpected_payload(field: &'static str, err: &serde_json::Error) -> Self {
        Self::UnexpectedPayload {
            field,
            reason: err.to_string(),
        }
    }
}
