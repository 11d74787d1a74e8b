//! The command dispatcher: one queue, one worker, strict FIFO.
//!
//! Every command from every caller (the public API and the keep-alive
//! watchdog alike) flows through a single unbounded queue consumed by
//! exactly one worker task. That single-consumer discipline is the
//! engine's core correctness mechanism: the session id is owned by the
//! worker, so no lock guards it, and a command submitted before another
//! reaches the server first.
//!
//! A per-command failure resolves that command's deferred and nothing
//! else; the worker always proceeds to the next queued command.

use std::sync::Arc;

use metrics::counter;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use xjcp_core::command::{Command, Op};
use xjcp_core::envelope::{ResponseEnvelope, encode_request};

use crate::error::ClientError;
use crate::events::EventHandler;
use crate::session::SessionState;
use crate::transport::Transport;

/// Resolves one command's deferred result with the raw result field.
pub(crate) type RawCompleter = Box<dyn FnOnce(Result<Value, ClientError>) + Send>;

/// One queue entry: the command and how to resolve it.
pub(crate) struct QueuedCommand {
    pub(crate) command: Command,
    pub(crate) complete: RawCompleter,
}

/// Run the dispatcher worker until every sender is gone and the queue is
/// drained.
pub(crate) async fn run_dispatcher(
    mut queue: mpsc::UnboundedReceiver<QueuedCommand>,
    session: Arc<SessionState>,
    transport: Arc<dyn Transport>,
    handler: Option<Arc<dyn EventHandler>>,
) {
    // Owned here, not shared: only this task ever reads or writes it.
    let mut session_id: Option<String> = None;

    while let Some(queued) = queue.recv().await {
        // Stamp the clock before sending so a stuck request cannot make
        // the watchdog busy-loop behind it.
        session.touch();
        counter!("xjcp_client_commands_total").increment(1);

        let op = queued.command.op();
        debug!(?op, "dispatching command");

        let outcome = execute(
            &queued.command,
            &mut session_id,
            &session,
            transport.as_ref(),
            handler.as_deref(),
        )
        .await;

        if let Err(error) = &outcome {
            debug!(?op, %error, "command failed");
        }
        (queued.complete)(outcome);
    }

    debug!("command queue closed; dispatcher exiting");
}

/// Execute one command: encode, exchange, decode, deliver events, extract
/// the result.
async fn execute(
    command: &Command,
    session_id: &mut Option<String>,
    session: &SessionState,
    transport: &dyn Transport,
    handler: Option<&dyn EventHandler>,
) -> Result<Value, ClientError> {
    let envelope = encode_request(session_id.as_deref(), command);
    let body = envelope.to_string();

    let raw = transport.exchange(&body).await?;
    if command.op() == Op::Ping {
        trace!(response = %raw, "ping response");
    }

    let mut response = ResponseEnvelope::parse(&raw)?;

    // Events ride on every response, whatever the operation was, and are
    // delivered before the command's own result resolves.
    if let Some(handler) = handler {
        for event in response.events() {
            counter!("xjcp_client_events_total").increment(1);
            handler.handle_event(&event);
        }
    }

    if command.op() == Op::Login {
        return Ok(match response.session_id() {
            Some(id) => {
                *session_id = Some(id.to_string());
                session.set_authenticated();
                debug!("login granted a session");
                Value::Bool(true)
            }
            None => {
                debug!("login rejected");
                Value::Bool(false)
            }
        });
    }

    Ok(match command.op().result_field() {
        Some(field) => response.take_result(field),
        None => Value::Null,
    })
}
