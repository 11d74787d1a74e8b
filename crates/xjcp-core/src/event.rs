//! Server-pushed event records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A server-pushed notification, delivered inside any response envelope
/// independently of the request that triggered it.
///
/// Events are ephemeral: decoded during response handling, handed to the
/// registered handler by reference, and dropped afterwards. Unknown
/// members are preserved in [`Event::extra`] so newer server payloads
/// survive a round through an older client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type discriminator (e.g. `"message"`, `"typing"`).
    #[serde(rename = "type")]
    pub kind: String,

    /// Conversation the event belongs to, when it is conversation-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,

    /// Human-readable event body, when the type carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Members this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_minimal_event() {
        let event: Event = serde_json::from_value(json!({ "type": "presence" })).unwrap();
        assert_eq!(event.kind, "presence");
        assert!(event.conversation.is_none());
        assert!(event.message.is_none());
    }

    #[test]
    fn decodes_conversation_scoped_event() {
        let event: Event = serde_json::from_value(json!({
            "type": "message",
            "conversation": "conv-1",
            "message": "hi there",
        }))
        .unwrap();
        assert_eq!(event.conversation.as_deref(), Some("conv-1"));
        assert_eq!(event.message.as_deref(), Some("hi there"));
    }

    #[test]
    fn unknown_members_land_in_extra() {
        let event: Event = serde_json::from_value(json!({
            "type": "message",
            "sender": "bob",
            "priority": 3,
        }))
        .unwrap();
        assert_eq!(event.extra["sender"], "bob");
        assert_eq!(event.extra["priority"], 3);
    }

    #[test]
    fn missing_type_is_rejected() {
        let result: Result<Event, _> = serde_json::from_value(json!({ "conversation": "c" }));
        assert!(result.is_err());
    }
}
