//! Envelope codec: outbound request construction and inbound response
//! parsing.
//!
//! An XJCP request envelope is a single JSON object: the session id under
//! `id`, and the operation payload under the operation's request key.
//! Two shapes are special: login's payload *is* the envelope (credentials
//! at top level, no id yet), and ping is the bare `{"id": …}` with no
//! operation member at all. The `id` member is omitted entirely while the
//! session is unauthenticated.
//!
//! Responses are decoded leniently: missing members are normal outcomes,
//! and event extraction never fails the surrounding command.

use serde_json::{Map, Value};
use tracing::warn;

use crate::command::{Command, Op};
use crate::error::EnvelopeError;
use crate::event::Event;

/// Build the outbound envelope for `command` under the given session.
pub fn encode_request(session_id: Option<&str>, command: &Command) -> Value {
    match command.op() {
        Op::Login => command.payload().clone(),
        Op::Ping => {
            let mut envelope = Map::new();
            insert_session_id(&mut envelope, session_id);
            Value::Object(envelope)
        }
        op => {
            let mut envelope = Map::new();
            insert_session_id(&mut envelope, session_id);
            // request_key() is Some for every op other than Login/Ping
            if let Some(key) = op.request_key() {
                let _ = envelope.insert(key.to_string(), command.payload().clone());
            }
            Value::Object(envelope)
        }
    }
}

fn insert_session_id(envelope: &mut Map<String, Value>, session_id: Option<&str>) {
    if let Some(id) = session_id {
        let _ = envelope.insert("id".to_string(), Value::String(id.to_string()));
    }
}

/// A decoded response envelope.
///
/// Holds the raw object; accessors pull out the session id (login only),
/// one operation result field, and the pushed event list.
#[derive(Debug)]
pub struct ResponseEnvelope {
    object: Map<String, Value>,
}

impl ResponseEnvelope {
    /// Parse a raw response body.
    ///
    /// The body must be a JSON object; anything else is a decode error.
    pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(body).map_err(|e| EnvelopeError::json(&e))?;
        match value {
            Value::Object(object) => Ok(Self { object }),
            Value::Null => Err(EnvelopeError::NotAnObject { found: "null" }),
            Value::Bool(_) => Err(EnvelopeError::NotAnObject { found: "boolean" }),
            Value::Number(_) => Err(EnvelopeError::NotAnObject { found: "number" }),
            Value::String(_) => Err(EnvelopeError::NotAnObject { found: "string" }),
            Value::Array(_) => Err(EnvelopeError::NotAnObject { found: "array" }),
        }
    }

    /// The session id granted by a login response, when present.
    pub fn session_id(&self) -> Option<&str> {
        self.object.get("id").and_then(Value::as_str)
    }

    /// Remove and return the named result field.
    ///
    /// An absent field yields [`Value::Null`] — "nothing happened" is a
    /// normal outcome, not a protocol violation.
    pub fn take_result(&mut self, field: &str) -> Value {
        self.object.remove(field).unwrap_or(Value::Null)
    }

    /// Decode the pushed `events` array, preserving arrival order.
    ///
    /// An absent or non-array `events` member yields an empty list.
    /// Malformed elements are skipped with a warning; well-formed
    /// siblings are still delivered.
    pub fn events(&self) -> Vec<Event> {
        let Some(Value::Array(raw)) = self.object.get("events") else {
            return Vec::new();
        };
        let mut events = Vec::with_capacity(raw.len());
        for (index, item) in raw.iter().enumerate() {
            match serde_json::from_value::<Event>(item.clone()) {
                Ok(event) => events.push(event),
                Err(e) => warn!(index, error = %e, "skipping malformed event"),
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn login_envelope_is_the_payload() {
        let envelope = encode_request(None, &Command::login("alice", "pw"));
        assert_eq!(envelope, json!({ "user": "alice", "pw": "pw" }));
    }

    #[test]
    fn unauthenticated_envelope_omits_id() {
        let envelope = encode_request(None, &Command::chats());
        assert!(envelope.get("id").is_none());
        assert_eq!(envelope["getChats"], json!({}));
    }

    #[test]
    fn authenticated_envelope_carries_id() {
        let envelope = encode_request(Some("abc"), &Command::message("c1", "hi"));
        assert_eq!(envelope["id"], "abc");
        assert_eq!(envelope["message"]["conversation"], "c1");
    }

    #[test]
    fn ping_envelope_is_id_only() {
        let envelope = encode_request(Some("abc"), &Command::ping());
        assert_eq!(envelope, json!({ "id": "abc" }));
    }

    #[test]
    fn string_payload_sits_under_its_key() {
        let envelope = encode_request(Some("abc"), &Command::remove_events("c1"));
        assert_eq!(envelope["removeEvent"], "c1");
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert_matches!(
            ResponseEnvelope::parse("{not json"),
            Err(EnvelopeError::Json { .. })
        );
    }

    #[test]
    fn parse_rejects_non_object() {
        assert_matches!(
            ResponseEnvelope::parse("[1, 2]"),
            Err(EnvelopeError::NotAnObject { found: "array" })
        );
        assert_matches!(
            ResponseEnvelope::parse("null"),
            Err(EnvelopeError::NotAnObject { found: "null" })
        );
    }

    #[test]
    fn session_id_reads_string_id() {
        let envelope = ResponseEnvelope::parse(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(envelope.session_id(), Some("abc"));
    }

    #[test]
    fn take_result_defaults_to_null() {
        let mut envelope = ResponseEnvelope::parse(r#"{"onMessage": "ok"}"#).unwrap();
        assert_eq!(envelope.take_result("onMessage"), json!("ok"));
        assert_eq!(envelope.take_result("onMessage"), Value::Null);
        assert_eq!(envelope.take_result("onGetChats"), Value::Null);
    }

    #[test]
    fn events_absent_is_empty() {
        let envelope = ResponseEnvelope::parse("{}").unwrap();
        assert!(envelope.events().is_empty());
    }

    #[test]
    fn events_preserve_arrival_order() {
        let envelope = ResponseEnvelope::parse(
            r#"{"events": [
                {"type": "message", "conversation": "c1"},
                {"type": "typing", "conversation": "c2"}
            ]}"#,
        )
        .unwrap();
        let events = envelope.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, "message");
        assert_eq!(events[1].kind, "typing");
    }

    #[test]
    fn malformed_event_is_skipped_not_fatal() {
        let envelope = ResponseEnvelope::parse(
            r#"{"events": [
                {"conversation": "no type member"},
                {"type": "message"}
            ]}"#,
        )
        .unwrap();
        let events = envelope.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "message");
    }

    #[test]
    fn events_non_array_is_empty() {
        let envelope = ResponseEnvelope::parse(r#"{"events": "nope"}"#).unwrap();
        assert!(envelope.events().is_empty());
    }
}
