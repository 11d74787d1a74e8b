//! Keep-alive watchdog.
//!
//! An independently scheduled loop that keeps the session alive without
//! caller involvement: whenever the session has been idle longer than the
//! configured interval, it submits one ping through the same queue every
//! other command uses, then sleeps for the *remaining* time to the next
//! deadline. Every command refreshes the last-request clock, not just
//! pings, so the watchdog stays quiet during active use; it is a liveness
//! backstop, not a periodic heartbeat.
//!
//! Ping failures and timeouts are logged and swallowed; nothing here ever
//! reaches a caller.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use xjcp_core::command::Command;

use crate::deferred::Deferred;
use crate::dispatch::QueuedCommand;
use crate::error::ClientError;
use crate::session::SessionState;

/// Start the watchdog task.
pub(crate) fn spawn(
    session: Arc<SessionState>,
    queue: mpsc::UnboundedSender<QueuedCommand>,
    ping_timeout: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run(session, queue, ping_timeout, cancel))
}

async fn run(
    session: Arc<SessionState>,
    queue: mpsc::UnboundedSender<QueuedCommand>,
    ping_timeout: Duration,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        if session.idle() > session.keep_alive_interval() && session.is_authenticated() {
            let Some(pending) = submit_ping(&queue) else {
                // Queue is gone; the client shut down underneath us.
                break;
            };
            counter!("xjcp_client_pings_total").increment(1);
            tokio::select! {
                () = cancel.cancelled() => break,
                outcome = pending.wait_timeout(ping_timeout) => match outcome {
                    Ok(()) => trace!("keep-alive ping completed"),
                    Err(ClientError::Timeout { .. }) => warn!("keep-alive ping timed out"),
                    Err(error) => warn!(%error, "keep-alive ping failed"),
                },
            }
        }

        // Sleep only the remainder to the next deadline: a command that
        // just refreshed the clock pushes the deadline out, and a ping we
        // just sent did the same. A non-positive remainder (unauthenticated
        // idle, or a send stuck past the deadline) falls back to a full
        // interval so the loop cannot spin.
        let interval = session.keep_alive_interval();
        let remaining = interval.saturating_sub(session.idle());
        let sleep_for = if remaining.is_zero() { interval } else { remaining };
        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(sleep_for) => {}
        }
    }
    debug!("keep-alive watchdog stopped");
}

/// Enqueue one ping; `None` when the dispatcher queue is closed.
fn submit_ping(queue: &mpsc::UnboundedSender<QueuedCommand>) -> Option<Deferred<()>> {
    let (deferred, completion) = Deferred::new();
    let queued = QueuedCommand {
        command: Command::ping(),
        complete: Box::new(move |outcome: Result<Value, ClientError>| match outcome {
            Ok(_) => completion.fulfill(()),
            Err(error) => completion.fail(error),
        }),
    };
    queue.send(queued).ok().map(|()| deferred)
}
