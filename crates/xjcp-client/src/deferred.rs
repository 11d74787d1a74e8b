//! Single-assignment deferred results.
//!
//! Every submitted command yields a [`Deferred`] immediately; the
//! dispatcher worker resolves it later through the paired [`Completion`].
//! Single assignment is structural: `fulfill` and `fail` consume the
//! completion, so a second transition cannot be expressed at all.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::ClientError;

/// The pending result of one submitted command.
///
/// Waiters may block with [`Deferred::wait`], bound the wait with
/// [`Deferred::wait_timeout`], or poll without blocking via
/// [`Deferred::try_take`].
#[derive(Debug)]
pub struct Deferred<T> {
    rx: oneshot::Receiver<Result<T, ClientError>>,
}

/// The write side of a [`Deferred`]; held by the dispatcher.
///
/// Dropping it unresolved fails the deferred with [`ClientError::Closed`].
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<Result<T, ClientError>>,
}

impl<T> Deferred<T> {
    /// Create an unresolved deferred and its completion.
    pub fn new() -> (Self, Completion<T>) {
        let (tx, rx) = oneshot::channel();
        (Self { rx }, Completion { tx })
    }

    /// Wait for the outcome.
    ///
    /// A completion dropped without resolving maps to
    /// [`ClientError::Closed`].
    pub async fn wait(self) -> Result<T, ClientError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_dropped) => Err(ClientError::Closed),
        }
    }

    /// Wait for the outcome, at most `timeout`.
    pub async fn wait_timeout(self, timeout: Duration) -> Result<T, ClientError> {
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_dropped)) => Err(ClientError::Closed),
            Err(_elapsed) => Err(ClientError::Timeout { timeout }),
        }
    }

    /// Take the outcome if it is already resolved; `None` while pending.
    ///
    /// Yields the outcome at most once; later calls report
    /// [`ClientError::Closed`].
    pub fn try_take(&mut self) -> Option<Result<T, ClientError>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(ClientError::Closed)),
        }
    }
}

impl<T> Completion<T> {
    /// Resolve with a success value. Consumes the completion.
    pub fn fulfill(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    /// Resolve with a failure. Consumes the completion.
    pub fn fail(self, error: ClientError) {
        let _ = self.tx.send(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn fulfill_then_wait() {
        let (deferred, completion) = Deferred::new();
        completion.fulfill(7);
        assert_eq!(deferred.wait().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn fail_then_wait() {
        let (deferred, completion) = Deferred::<u32>::new();
        completion.fail(ClientError::Closed);
        assert_matches!(deferred.wait().await, Err(ClientError::Closed));
    }

    #[tokio::test]
    async fn waiters_resolve_across_tasks() {
        let (deferred, completion) = Deferred::new();
        let waiter = tokio::spawn(deferred.wait());
        completion.fulfill("done");
        assert_eq!(waiter.await.unwrap().unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn wait_timeout_elapses() {
        let (deferred, _completion) = Deferred::<u32>::new();
        let outcome = deferred.wait_timeout(Duration::from_secs(1)).await;
        assert_matches!(outcome, Err(ClientError::Timeout { .. }));
    }

    #[tokio::test]
    async fn dropped_completion_fails_the_deferred() {
        let (deferred, completion) = Deferred::<u32>::new();
        drop(completion);
        assert_matches!(deferred.wait().await, Err(ClientError::Closed));
    }

    #[tokio::test]
    async fn try_take_pending_then_resolved() {
        let (mut deferred, completion) = Deferred::new();
        assert!(deferred.try_take().is_none());
        completion.fulfill(1);
        assert_eq!(deferred.try_take().unwrap().unwrap(), 1);
        assert_matches!(deferred.try_take(), Some(Err(ClientError::Closed)));
    }
}
