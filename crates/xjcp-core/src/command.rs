//! Protocol operations and outbound commands.
//!
//! Every client-visible operation maps to one [`Op`] with a fixed request
//! key and (for operations that return something) a fixed result field in
//! the response envelope. A [`Command`] pairs an [`Op`] with its JSON
//! payload and is immutable once built — construct one per request via the
//! per-operation constructors.

use serde_json::{Value, json};

/// The named XJCP operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Authenticate and obtain a session id.
    Login,
    /// Send a chat message to a conversation.
    Message,
    /// Fetch the caller's conversation list.
    GetChats,
    /// Fetch the caller's contact list.
    GetContacts,
    /// Fetch message history for one conversation.
    GetHistory,
    /// Clear pending events for one conversation.
    RemoveEvent,
    /// Create a conversation with the given participants.
    NewConversation,
    /// Rename an existing conversation.
    RenameConversation,
    /// Change the caller's display name.
    SetName,
    /// Add a user to the caller's contacts.
    AddFriend,
    /// Change the caller's presence status.
    SetStatus,
    /// Inject a synthetic event into a conversation.
    InjectEvent,
    /// Session keep-alive; carries no payload and expects no result.
    Ping,
}

impl Op {
    /// The envelope member that carries this operation's payload.
    ///
    /// `None` for [`Op::Login`] (the payload forms the envelope itself)
    /// and [`Op::Ping`] (the envelope is the bare session id).
    pub fn request_key(self) -> Option<&'static str> {
        match self {
            Op::Login | Op::Ping => None,
            Op::Message => Some("message"),
            Op::GetChats => Some("getChats"),
            Op::GetContacts => Some("getContacts"),
            Op::GetHistory => Some("getHistory"),
            Op::RemoveEvent => Some("removeEvent"),
            Op::NewConversation => Some("newConversation"),
            Op::RenameConversation => Some("renameConversation"),
            Op::SetName => Some("setName"),
            Op::AddFriend => Some("addFriend"),
            Op::SetStatus => Some("setStatus"),
            Op::InjectEvent => Some("injectEvent"),
        }
    }

    /// The response member that carries this operation's result.
    ///
    /// `None` for fire-and-forget operations; a missing field in the
    /// response is a normal empty outcome either way, never an error.
    pub fn result_field(self) -> Option<&'static str> {
        match self {
            Op::Login => Some("id"),
            Op::Message => Some("onMessage"),
            Op::GetChats => Some("onGetChats"),
            Op::GetContacts => Some("onGetContacts"),
            Op::GetHistory => Some("onGetHistory"),
            Op::NewConversation => Some("onNewConversation"),
            Op::RenameConversation => Some("onRenameConversation"),
            Op::AddFriend => Some("onAddFriend"),
            Op::InjectEvent => Some("onInjectEvent"),
            Op::RemoveEvent | Op::SetName | Op::SetStatus | Op::Ping => None,
        }
    }
}

/// One outbound operation with its payload, immutable once constructed.
#[derive(Clone, Debug)]
pub struct Command {
    op: Op,
    payload: Value,
}

impl Command {
    /// Authenticate with a username and password.
    pub fn login(user: &str, password: &str) -> Self {
        Self {
            op: Op::Login,
            payload: json!({ "user": user, "pw": password }),
        }
    }

    /// Send `text` to `conversation`.
    pub fn message(conversation: &str, text: &str) -> Self {
        Self {
            op: Op::Message,
            payload: json!({ "conversation": conversation, "message": text }),
        }
    }

    /// Request the conversation list.
    pub fn chats() -> Self {
        Self {
            op: Op::GetChats,
            payload: json!({}),
        }
    }

    /// Request the contact list.
    pub fn contacts() -> Self {
        Self {
            op: Op::GetContacts,
            payload: json!({}),
        }
    }

    /// Request the last `count` messages of `conversation`.
    pub fn history(conversation: &str, count: u32) -> Self {
        Self {
            op: Op::GetHistory,
            payload: json!({ "conversation": conversation, "count": count }),
        }
    }

    /// Clear pending events for `conversation`.
    pub fn remove_events(conversation: &str) -> Self {
        Self {
            op: Op::RemoveEvent,
            payload: json!(conversation),
        }
    }

    /// Create a conversation with `participants`.
    pub fn new_conversation(participants: &[String]) -> Self {
        Self {
            op: Op::NewConversation,
            payload: json!({ "participants": participants }),
        }
    }

    /// Rename `conversation` to `name`.
    pub fn rename_conversation(conversation: &str, name: &str) -> Self {
        Self {
            op: Op::RenameConversation,
            payload: json!({ "conversation": conversation, "name": name }),
        }
    }

    /// Change the caller's display name.
    pub fn set_name(name: &str) -> Self {
        Self {
            op: Op::SetName,
            payload: json!(name),
        }
    }

    /// Add `user` to the caller's contacts.
    pub fn add_friend(user: &str) -> Self {
        Self {
            op: Op::AddFriend,
            payload: json!(user),
        }
    }

    /// Change the caller's presence status.
    pub fn set_status(status: i32) -> Self {
        Self {
            op: Op::SetStatus,
            payload: json!(status),
        }
    }

    /// Inject a synthetic event of type `kind` into `conversation`.
    pub fn inject_event(conversation: &str, kind: &str, message: &str) -> Self {
        Self {
            op: Op::InjectEvent,
            payload: json!({
                "conversation": conversation,
                "type": kind,
                "message": message,
            }),
        }
    }

    /// Session keep-alive.
    pub fn ping() -> Self {
        Self {
            op: Op::Ping,
            payload: Value::Null,
        }
    }

    /// The operation this command performs.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The JSON payload carried under the operation's request key.
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}
