//! Envelope decode errors.

/// Errors raised while decoding a response envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// Response body is not valid JSON.
    #[error("response body is not valid JSON: {reason}")]
    Json {
        /// Parser error description.
        reason: String,
    },
    /// Response body parsed, but is not a JSON object.
    #[error("response envelope is not a JSON object (got {found})")]
    NotAnObject {
        /// Short description of what was found instead.
        found: &'static str,
    },
}

impl EnvelopeError {
    pub(crate) fn json(err: &serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}
