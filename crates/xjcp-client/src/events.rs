//! Event handler seam.

use xjcp_core::event::Event;

/// Receiver for server-pushed events.
///
/// Injected at client construction; invoked synchronously on the
/// dispatcher worker, in arrival order, before the triggering command's
/// deferred result resolves. Keep implementations fast — a slow handler
/// delays every subsequent command. The event is borrowed; copy it if it
/// must outlive the call.
pub trait EventHandler: Send + Sync {
    /// Handle one pushed event.
    fn handle_event(&self, event: &Event);
}

impl<F> EventHandler for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn handle_event(&self, event: &Event) {
        self(event);
    }
}
