//! # xjcp-client
//!
//! Asynchronous client engine for the XJCP messaging protocol.
//!
//! The engine issues named operations over HTTP+JSON, hands back a
//! deferred result per operation, and pushes server-originated events
//! (embedded in every response) to an injected handler. Internally:
//!
//! - **[`Client`]**: the public API, typed operations plus a raw
//!   [`Client::submit`]
//! - **[`Deferred`]/[`Completion`]**: single-assignment async results
//! - **Dispatcher**: one queue, one worker, strict FIFO; owns the
//!   session id so no lock guards it
//! - **Keep-alive watchdog**: pings only when the session has been idle
//!   past the configured interval
//! - **[`Transport`]**: the HTTP seam; [`HttpTransport`] POSTs one form
//!   field `msg` per command
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use xjcp_client::{Client, ClientConfig};
//!
//! # async fn run() -> Result<(), xjcp_client::ClientError> {
//! let client = Client::new(ClientConfig::new("http://chat.example/xjcp"))?;
//! let logged_in = client.login("alice", "secret").wait().await?;
//! if logged_in {
//!     let receipt = client.send_message("conv-1", "hello").wait().await?;
//!     println!("delivered: {receipt}");
//! }
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod client;
mod config;
mod deferred;
mod dispatch;
mod error;
mod events;
mod keepalive;
mod session;
mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use deferred::{Completion, Deferred};
pub use error::ClientError;
pub use events::EventHandler;
pub use transport::{HttpTransport, Transport, TransportError};

// The protocol vocabulary callers need alongside the engine.
pub use xjcp_core::command::{Command, Op};
pub use xjcp_core::event::Event;
pub use xjcp_core::records::{ChatHistory, ChatMessage, Contact, Conversation};
