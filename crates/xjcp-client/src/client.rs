//! The public XJCP client.
//!
//! Construction spawns the dispatcher worker and the keep-alive watchdog
//! on the current tokio runtime. Every operation returns a
//! [`Deferred`] immediately; the network exchange happens on the worker.
//! Callers that want synchronous behavior block on the deferred with
//! their own timeout.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use xjcp_core::command::Command;
use xjcp_core::records::{ChatHistory, Contact, Conversation};

use crate::config::ClientConfig;
use crate::deferred::Deferred;
use crate::dispatch::{QueuedCommand, RawCompleter, run_dispatcher};
use crate::error::ClientError;
use crate::events::EventHandler;
use crate::keepalive;
use crate::session::SessionState;
use crate::transport::{HttpTransport, Transport};

/// Asynchronous XJCP client engine.
///
/// All operations are dispatched by one worker, strictly in submission
/// order. The client is cheap to share behind an `Arc`; all methods take
/// `&self`.
pub struct Client {
    /// `None` after shutdown; taking it closes the queue.
    queue: Mutex<Option<mpsc::UnboundedSender<QueuedCommand>>>,
    session: Arc<SessionState>,
    cancel: CancellationToken,
    watchdog: Mutex<Option<JoinHandle<()>>>,
}

impl Client {
    /// Connect to `config.host` over HTTP, without an event handler.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_handler_opt(config, None)
    }

    /// Connect with an event handler for server-pushed events.
    pub fn with_handler(
        config: ClientConfig,
        handler: Arc<dyn EventHandler>,
    ) -> Result<Self, ClientError> {
        Self::with_handler_opt(config, Some(handler))
    }

    fn with_handler_opt(
        config: ClientConfig,
        handler: Option<Arc<dyn EventHandler>>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(&config.host, config.request_timeout)?;
        Ok(Self::start(config, Arc::new(transport), handler))
    }

    /// Connect over an injected transport (the test seam).
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        handler: Option<Arc<dyn EventHandler>>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self::start(config, transport, handler))
    }

    fn start(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        handler: Option<Arc<dyn EventHandler>>,
    ) -> Self {
        let session = Arc::new(SessionState::new(config.keep_alive_interval));
        let (tx, rx) = mpsc::unbounded_channel();

        let _ = tokio::spawn(run_dispatcher(
            rx,
            Arc::clone(&session),
            transport,
            handler,
        ));

        let cancel = CancellationToken::new();
        let watchdog = keepalive::spawn(
            Arc::clone(&session),
            tx.clone(),
            config.ping_timeout,
            cancel.clone(),
        );

        Self {
            queue: Mutex::new(Some(tx)),
            session,
            cancel,
            watchdog: Mutex::new(Some(watchdog)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Authenticate. Fulfills `true` and stores the session id when the
    /// server grants one, `false` when it does not; both are successful
    /// completions, not errors.
    pub fn login(&self, user: &str, password: &str) -> Deferred<bool> {
        debug!(user, "performing login");
        self.submit_mapped(Command::login(user, password), |value| {
            Ok(value.as_bool().unwrap_or(false))
        })
    }

    /// Send `text` to `conversation`; resolves to the server's receipt
    /// (empty when the server sends none).
    pub fn send_message(&self, conversation: &str, text: &str) -> Deferred<String> {
        self.submit_mapped(Command::message(conversation, text), |value| match value {
            Value::Null => Ok(String::new()),
            Value::String(receipt) => Ok(receipt),
            other => Err(unexpected("onMessage", &other)),
        })
    }

    /// Fetch the conversation list.
    pub fn request_chats(&self) -> Deferred<Vec<Conversation>> {
        self.submit_mapped(Command::chats(), |value| decode_list("onGetChats", value))
    }

    /// Fetch the contact list.
    pub fn request_contacts(&self) -> Deferred<Vec<Contact>> {
        self.submit_mapped(Command::contacts(), |value| {
            decode_list("onGetContacts", value)
        })
    }

    /// Fetch up to `count` history entries for `conversation`.
    pub fn request_history(
        &self,
        conversation: &str,
        count: u32,
    ) -> Deferred<Option<ChatHistory>> {
        self.submit_mapped(Command::history(conversation, count), |value| {
            decode_optional("onGetHistory", value)
        })
    }

    /// Clear pending events for `conversation`.
    pub fn remove_events(&self, conversation: &str) -> Deferred<()> {
        self.submit_mapped(Command::remove_events(conversation), |_| Ok(()))
    }

    /// Create a conversation; resolves to its id when the server reports
    /// one.
    pub fn create_conversation(&self, participants: &[String]) -> Deferred<Option<String>> {
        self.submit_mapped(Command::new_conversation(participants), |value| {
            decode_optional_string("onNewConversation", value)
        })
    }

    /// Rename a conversation; resolves to the confirmed name when the
    /// server reports one.
    pub fn rename_conversation(&self, conversation: &str, name: &str) -> Deferred<Option<String>> {
        self.submit_mapped(Command::rename_conversation(conversation, name), |value| {
            decode_optional_string("onRenameConversation", value)
        })
    }

    /// Change the caller's display name.
    pub fn rename_self(&self, name: &str) -> Deferred<()> {
        self.submit_mapped(Command::set_name(name), |_| Ok(()))
    }

    /// Add `user` to the caller's contacts.
    pub fn add_friend(&self, user: &str) -> Deferred<Option<String>> {
        self.submit_mapped(Command::add_friend(user), |value| {
            decode_optional_string("onAddFriend", value)
        })
    }

    /// Change the caller's presence status.
    pub fn set_status(&self, status: i32) -> Deferred<()> {
        self.submit_mapped(Command::set_status(status), |_| Ok(()))
    }

    /// Inject a synthetic event into `conversation`.
    pub fn inject_event(
        &self,
        conversation: &str,
        kind: &str,
        message: &str,
    ) -> Deferred<Option<String>> {
        self.submit_mapped(Command::inject_event(conversation, kind, message), |value| {
            decode_optional_string("onInjectEvent", value)
        })
    }

    /// Submit a raw command; resolves to the raw result field
    /// ([`Value::Null`] when the operation has none or the server omitted
    /// it).
    pub fn submit(&self, command: Command) -> Deferred<Value> {
        self.submit_mapped(command, Ok)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session control
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the keep-alive interval.
    ///
    /// # Panics
    ///
    /// Panics when `interval` is zero; the interval must stay strictly
    /// positive.
    pub fn set_keep_alive_interval(&self, interval: Duration) {
        assert!(
            !interval.is_zero(),
            "keep-alive interval must be strictly positive"
        );
        self.session.set_keep_alive_interval(interval);
    }

    /// Stop the watchdog and stop accepting new commands.
    ///
    /// Commands already queued or in flight finish or fail naturally;
    /// later submissions resolve to [`ClientError::Closed`].
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let closed = self.queue.lock().take();
        drop(closed);

        let watchdog = self.watchdog.lock().take();
        if let Some(handle) = watchdog {
            if let Err(error) = handle.await {
                debug!(%error, "watchdog join failed");
            }
        }
    }

    fn submit_mapped<T, F>(&self, command: Command, decode: F) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(Value) -> Result<T, ClientError> + Send + 'static,
    {
        let (deferred, completion) = Deferred::new();
        let complete: RawCompleter = Box::new(move |outcome| match outcome.and_then(decode) {
            Ok(value) => completion.fulfill(value),
            Err(error) => completion.fail(error),
        });
        let queued = QueuedCommand { command, complete };

        let sender = self.queue.lock().clone();
        let rejected = match sender {
            Some(tx) => tx.send(queued).err().map(|e| e.0),
            None => Some(queued),
        };
        if let Some(queued) = rejected {
            (queued.complete)(Err(ClientError::Closed));
        }
        deferred
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("authenticated", &self.session.is_authenticated())
            .field("closed", &self.queue.lock().is_none())
            .finish_non_exhaustive()
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        // Without this the watchdog (which holds a queue sender) would
        // keep both background tasks alive forever.
        self.cancel.cancel();
        let _ = self.queue.lock().take();
    }
}

fn unexpected(field: &'static str, value: &Value) -> ClientError {
    ClientError::UnexpectedPayload {
        field,
        reason: format!("unsupported JSON shape: {value}"),
    }
}

fn decode_list<T: DeserializeOwned>(field: &'static str, value: Value) -> Result<Vec<T>, ClientError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| ClientError::unexpected_payload(field, &e))
}

fn decode_optional<T: DeserializeOwned>(
    field: &'static str,
    value: Value,
) -> Result<Option<T>, ClientError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ClientError::unexpected_payload(field, &e))
}

fn decode_optional_string(field: &'static str, value: Value) -> Result<Option<String>, ClientError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(unexpected(field, &other)),
    }
}
