//! Domain payload records returned by query operations.
//!
//! These are structured payloads only — the engine never interprets them.
//! All fields default and unknown members are ignored, so a server that
//! sends more (or less) than this client models still decodes.

use serde::{Deserialize, Serialize};

/// One entry of the caller's conversation list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Opaque conversation identifier.
    #[serde(default)]
    pub id: String,
    /// Display name of the conversation.
    #[serde(default)]
    pub name: String,
    /// Server timestamp of the last activity, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    /// Number of unread messages, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread: Option<u32>,
}

/// One entry of the caller's contact list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Opaque user identifier.
    #[serde(default)]
    pub id: String,
    /// Display name of the contact.
    #[serde(default)]
    pub name: String,
    /// Presence status code, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

/// One message inside a [`ChatHistory`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author's user identifier.
    #[serde(default)]
    pub author: String,
    /// Message body.
    #[serde(default)]
    pub message: String,
    /// Server timestamp, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

/// Message history for one conversation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    /// The conversation the history belongs to.
    #[serde(default)]
    pub conversation: String,
    /// Messages in server order (oldest first).
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}
